pub mod attendance;
pub mod backup_exchange;
pub mod core;
pub mod course;
pub mod equipment;
pub mod history;
pub mod roster;
pub mod seats;
pub mod supervisors;
pub mod teacher_stations;
pub mod workstations;
