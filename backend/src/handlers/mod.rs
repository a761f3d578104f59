pub mod crew_member;
pub mod fish_type;
pub mod trip;
pub mod vessel;
pub mod weekly_sheet;
