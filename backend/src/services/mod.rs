pub mod crew_member;
pub mod fish_type;
pub mod settlement;
pub mod trip;
pub mod vessel;
pub mod weekly_sheet;

pub use crew_member::CrewMemberService;
pub use fish_type::FishTypeService;
pub use settlement::SettlementService;
pub use trip::TripService;
pub use vessel::VesselService;
pub use weekly_sheet::WeeklySheetService;
