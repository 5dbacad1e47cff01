pub mod dry_run;
pub mod twitter;

pub use dry_run::DryRunPublisher;
pub use twitter::TwitterPublisher;
