pub mod mx;
