pub mod identity;
pub mod level_counter;
pub mod location;
pub mod locations_config;
pub mod result_error;
pub mod size;

macro_rules! function_path {
    () => {
        concat!(module_path!(), "::", function_name!(), " ", file!(), ":", line!())
    };
}

pub(crate) use function_path;
