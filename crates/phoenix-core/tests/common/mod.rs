pub mod function_server;
