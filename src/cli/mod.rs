//! Terminal front-ends over the lookup gateway

pub mod lookup;
pub mod serve;
pub mod ui;
