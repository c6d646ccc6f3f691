mod pool;
mod server;
mod support;
