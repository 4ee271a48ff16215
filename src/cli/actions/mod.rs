pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        /// Postgres connection string; `None` serves from in-memory
        /// stores.
        dsn: Option<String>,
    },
}
