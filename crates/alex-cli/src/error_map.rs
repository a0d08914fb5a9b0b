use alex_core::AlexError;

pub(crate) fn emit_error(error: AlexError) -> i32 {
    eprintln!("Error: {}", error);
    tracing::error!(code = %error.code, "{}", error.message);
    1
}

pub(crate) fn map_cli_preload_read(error: std::io::Error) -> AlexError {
    AlexError::new("CLI_PRELOAD_READ", error.to_string())
}
