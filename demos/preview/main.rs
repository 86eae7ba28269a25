use storyflow::{DocumentModel, SessionBuilder};

fn main() {
    let text = include_str!("./story.json");

    let doc = DocumentModel::from_json(text).unwrap();

    let mut session = SessionBuilder::new().build(&doc).unwrap();
    println!("{}", session.story().schema());

    let mut page = session.render();
    loop {
        println!("\n== {} ({}) ==\n{}", page.title, page.kind.as_ref(), page.text);

        if page.is_terminal {
            if let Some(reason) = session.dead_end() {
                println!("[dead end: {}]", reason);
            }
            break;
        }

        // always take the last button
        let choice = page.choices.as_ref().and_then(|c| c.last()).map(|c| c.id.clone());
        if let Some(choices) = &page.choices {
            for c in choices {
                println!("  [{}] {}", c.id, c.label);
            }
        }
        page = session.choose(choice.as_deref()).unwrap();
    }

    println!("\nVariables: {:#}", session.variables().snapshot());
    println!("Steps: {}", serde_json::to_string_pretty(session.history()).unwrap());
}
