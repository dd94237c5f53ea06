pub mod announcements;
pub mod attachments;
pub mod comparison;
pub mod dosage;
pub mod refunds;
