pub mod home;
pub mod submissions;
pub mod system;
