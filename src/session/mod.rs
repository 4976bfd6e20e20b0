pub mod filter_session;
