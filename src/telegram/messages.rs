//! User-facing texts

pub const WELCOME: &str = "Welcome! Use /sample to get a sample file or /buy to purchase the full file.";
pub const SAMPLE_NOT_CONFIGURED: &str = "Sample file URL is not configured.";
pub const SAMPLE_FETCH_FAILED: &str = "Failed to retrieve the sample file. Please try again later.";
pub const PAYMENT_LINK_NOT_CONFIGURED: &str = "Payment link is not configured.";
pub const FULL_FILE_NOT_CONFIGURED: &str = "Full file link is not configured.";
pub const INVALID_PAYLOAD: &str = "Invalid payload.";

/// Invoice payload the bot accepts at pre-checkout
pub const EXPECTED_INVOICE_PAYLOAD: &str = "unique-payload";

pub fn payment_link(link: &str) -> String {
    format!("Click the following link to complete your payment: {link}")
}

pub fn payment_received(full_file_link: &str) -> String {
    format!("Thank you for your payment! You can download your full file from the following link: {full_file_link}")
}
