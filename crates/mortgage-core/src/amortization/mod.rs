pub mod schedule;
pub mod yearly;

pub use schedule::{build_schedule, ExtraPayments, PaymentRecord, Schedule, ScheduleInput};
pub use yearly::{interest_profile, yearly_summaries, InterestProfile, YearSummary};
