pub mod buydown;
pub mod payment;
pub mod schedule;
pub mod tax_benefit;
