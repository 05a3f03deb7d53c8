pub mod io;
pub mod url;

pub use self::{
    io::init_env_logger,
    url::{guess_site, parse_server_url},
};
