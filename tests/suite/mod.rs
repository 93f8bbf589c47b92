//! Integration test modules

mod bighuge_run;
mod offline_run;
