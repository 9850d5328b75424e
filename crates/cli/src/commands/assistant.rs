//! Chat assistant command.

use ecocycle_storefront::services::assistant::GREETING;
use ecocycle_storefront::state::AppState;

/// Send one message and print the reply.
pub async fn ask(state: &AppState, message: &str) {
    let assistant = state.assistant();
    if !assistant.is_enabled() {
        println!("The chat assistant is not configured (set ECOCYCLE_ASSISTANT_API_KEY).");
        return;
    }

    println!("{GREETING}");
    match assistant.ask(message).await {
        Some(reply) => println!("{reply}"),
        None => println!("Type a question to get started."),
    }
}
