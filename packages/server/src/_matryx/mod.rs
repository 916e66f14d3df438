pub mod e2ee_filter;
