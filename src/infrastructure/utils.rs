pub mod get_client_ip;
pub mod uploads;
pub mod valid_uuid;
