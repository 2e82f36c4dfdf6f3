pub mod contribution;
pub mod cooperative;
pub mod income;
pub mod ledger;
pub mod money;
pub mod report;
pub mod user;

pub use contribution::*;
pub use cooperative::*;
pub use income::*;
pub use ledger::*;
pub use money::*;
pub use report::*;
pub use user::*;
