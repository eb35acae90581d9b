//! Member domain module.
//!
//! # Module Structure
//!
//! - `aggregate` - Member entity and `MemberFields` input record
//! - `member_type` - Baptized / Visitor standing
//! - `email` - Email address value object

mod aggregate;
mod email;
mod member_type;

pub use aggregate::{Member, MemberFields};
pub use email::Email;
pub use member_type::MemberType;
