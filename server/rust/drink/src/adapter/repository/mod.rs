pub mod drink_postgres;
