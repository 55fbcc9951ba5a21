//! `Render` command line construction.

mod builder;
mod command;
mod gpu;
mod region;
mod table;

pub use builder::build_command_line;
pub use command::{split_options, CommandLine};
pub use gpu::{iray_arguments, octane_arguments, parse_devices, redshift_arguments, GpuRequest};
pub use region::{tile_arguments, Region};
pub use table::{
    arnold_verbosity, mental_ray_verbosity, output_prefix, renderer_arguments, ArnoldVerbosity,
    RendererArgs,
};
