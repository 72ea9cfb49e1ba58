mod engine_flow;
mod record;
mod session;
