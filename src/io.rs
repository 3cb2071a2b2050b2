pub mod csv_dump;
pub mod sigsci_client;
