use serde::Serialize;

#[derive(Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    pub api_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn output_success<T: Serialize>(data: T) -> anyhow::Result<()> {
    let response = CliResponse {
        success: true,
        api_version: env!("CARGO_PKG_VERSION"),
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Prints an error response to stderr and exits with code 1.
pub fn output_error(message: &str) -> ! {
    emit_error::<()>(message, None)
}

/// Like [`output_error`], with a payload describing the failure.
pub fn output_error_with<T: Serialize>(message: &str, data: T) -> ! {
    emit_error(message, Some(data))
}

fn emit_error<T: Serialize>(message: &str, data: Option<T>) -> ! {
    let response = CliResponse {
        success: false,
        api_version: env!("CARGO_PKG_VERSION"),
        data,
        error: Some(message.to_string()),
    };
    match serde_json::to_string(&response) {
        Ok(json) => eprintln!("{}", json),
        Err(_) => eprintln!("{}", message),
    }
    std::process::exit(1);
}
