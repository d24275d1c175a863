pub mod scenarios;

pub use scenarios::{
    analyze_buydown, bought_down_rate, break_even_months, default_point_levels, points_cost,
    BuydownComparison, BuydownInput, BuydownScenario, LoanPurpose,
};
