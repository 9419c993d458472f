pub mod ip_window;
