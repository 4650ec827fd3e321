// Drive command generation for the Playbot differential base
//
// Provides:
// - Unit conversions (radians <-> encoder ticks, pan angle -> servo pulse)
// - Trajectory -> cumulative wheel tick conversion
// - Firmware command file format

pub mod command;
pub mod kinematics;
pub mod units;

pub use command::{
    format_line, parse_commands, to_command_string, write_command_file, write_commands,
};
pub use kinematics::{convert, frame_delta, RobotGeometry};
pub use units::{radians_to_ticks, rotation_to_microseconds, ticks_to_radians};
