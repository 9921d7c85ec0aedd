pub mod alerts;
pub mod leads;
pub mod opportunities;
pub mod quotes;
pub mod setup;
pub mod top;
pub mod ui;
