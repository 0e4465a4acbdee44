//! External delivery channels.

pub mod webhook;
