mod output;

pub use output::{Output, offline_notice};
