pub mod backtest_service;
pub mod ingestion;

pub use backtest_service::{BacktestError, BacktestRequest, BacktestService};
pub use ingestion::{
    load_symbols, parse_symbol_list, IngestionError, IngestionReport, IngestionService,
    LoadedSeries,
};
