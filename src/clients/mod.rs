pub mod moenv_client;
pub mod waqi_client;
