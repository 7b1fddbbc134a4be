use std::io::Write;

use chrono::Local;

use notes_client::{
    api::{ApiClient, ApiError, NotePayload},
    editor::{ContentEditor, PlainTextEditor},
    model::Note,
    state::{Command, Controller, FormMode, Msg, NoticeKind},
};

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Fetch env variables
    let base_url =
        std::env::var("NOTES_API_URL").unwrap_or_else(|_| "http://localhost:3000/api".to_string());

    let client = ApiClient::new(base_url.clone());
    let mut controller = Controller::new();
    let mut editor = PlainTextEditor::default();

    println!("Notes client, talking to {base_url}");
    println!("Type 'help' for the command list.\n");

    // Initial load
    dispatch_commands(&client, &mut controller, Controller::startup()).await;
    render_notes(&controller);

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = read_line() else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" => render_notes(&controller),
            "cats" => render_categories(&controller),
            "form" => render_form(&controller, &editor),
            "reload" => {
                dispatch_commands(&client, &mut controller, Controller::startup()).await;
                render_notes(&controller);
            }
            "search" => {
                dispatch(&client, &mut controller, Msg::SearchChanged(rest.to_string())).await;
                render_notes(&controller);
            }
            "filter" => match parse_filter(rest) {
                Ok(filter) => {
                    dispatch(&client, &mut controller, Msg::CategoryFilterChanged(filter)).await;
                    render_notes(&controller);
                }
                Err(message) => println!("{message}"),
            },
            "new" => {
                dispatch(&client, &mut controller, Msg::CancelEdit).await;
                editor.set_content("");
                render_form(&controller, &editor);
            }
            "edit" => match rest.parse::<i64>() {
                Ok(id) => {
                    dispatch(&client, &mut controller, Msg::EditRequested(id)).await;
                    editor.set_content(&controller.form.content);
                    render_form(&controller, &editor);
                }
                Err(_) => println!("usage: edit <id>"),
            },
            "title" => {
                dispatch(&client, &mut controller, Msg::TitleChanged(rest.to_string())).await;
            }
            "content" => {
                editor.set_content(rest);
            }
            "cat" => match parse_filter(rest) {
                Ok(category_id) => {
                    dispatch(&client, &mut controller, Msg::CategoryPicked(category_id)).await;
                }
                Err(message) => println!("{message}"),
            },
            "save" => {
                // The editor owns the content between commands; read it back
                // right before submitting, as the form would from the widget.
                dispatch(
                    &client,
                    &mut controller,
                    Msg::ContentChanged(editor.content()),
                )
                .await;
                dispatch(&client, &mut controller, Msg::SubmitRequested).await;
                if controller.form.mode == FormMode::Create && controller.form.title.is_empty() {
                    editor.set_content("");
                    render_notes(&controller);
                }
            }
            "cancel" => {
                dispatch(&client, &mut controller, Msg::CancelEdit).await;
                editor.set_content("");
            }
            "delete" => match rest.parse::<i64>() {
                Ok(id) => {
                    dispatch(&client, &mut controller, Msg::DeleteRequested(id)).await;
                    print!("Are you sure you want to delete note {id}? [y/N] ");
                    let _ = std::io::stdout().flush();

                    let confirmed = read_line().is_some_and(|answer| {
                        matches!(answer.trim(), "y" | "Y" | "yes")
                    });
                    let msg = if confirmed {
                        Msg::DeleteConfirmed
                    } else {
                        Msg::DeleteCancelled
                    };
                    dispatch(&client, &mut controller, msg).await;
                    if confirmed {
                        editor.set_content(&controller.form.content);
                        render_notes(&controller);
                    }
                }
                Err(_) => println!("usage: delete <id>"),
            },
            "addcat" => {
                dispatch(
                    &client,
                    &mut controller,
                    Msg::NewCategoryNameChanged(rest.to_string()),
                )
                .await;
                dispatch(&client, &mut controller, Msg::AddCategoryRequested).await;
                render_categories(&controller);
            }
            _ => println!("Unknown command '{command}'. Type 'help' for the command list."),
        }
    }
}

/// Feeds one message to the controller and keeps executing the commands it
/// asks for until the loop drains, then prints any pending notice.
async fn dispatch(client: &ApiClient, controller: &mut Controller, msg: Msg) {
    let commands = controller.update(msg);
    dispatch_commands(client, controller, commands).await;
}

async fn dispatch_commands(client: &ApiClient, controller: &mut Controller, commands: Vec<Command>) {
    let mut queue = commands;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for command in queue {
            let msg = match run_command(client, command).await {
                Ok(msg) => msg,
                Err(e) => Msg::RequestFailed(e.to_string()),
            };
            next.extend(controller.update(msg));
        }
        queue = next;
    }

    if let Some(notice) = controller.take_notice() {
        let prefix = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        println!("[{prefix}] {}", notice.text);
    }
}

async fn run_command(client: &ApiClient, command: Command) -> Result<Msg, ApiError> {
    match command {
        Command::LoadNotes => client.get_all_notes().await.map(Msg::NotesLoaded),
        Command::LoadCategories => client.get_all_categories().await.map(Msg::CategoriesLoaded),
        Command::CreateNote {
            title,
            content,
            category_id,
        } => client
            .create_note(&NotePayload {
                title,
                content,
                category_id,
            })
            .await
            .map(|_| Msg::NoteSaved),
        Command::UpdateNote {
            id,
            title,
            content,
            category_id,
        } => client
            .update_note(
                id,
                &NotePayload {
                    title,
                    content,
                    category_id,
                },
            )
            .await
            .map(|_| Msg::NoteSaved),
        Command::DeleteNote(id) => client.delete_note(id).await.map(|()| Msg::NoteDeleted(id)),
        Command::CreateCategory { name } => client
            .create_category(&name)
            .await
            .map(|_| Msg::CategoryCreated),
    }
}

fn render_notes(controller: &Controller) {
    let notes = controller.visible_notes();
    println!("{} note(s)", notes.len());

    if notes.is_empty() {
        let filtered = !controller.search.is_empty() || controller.category_filter.is_some();
        if filtered {
            println!("No notes found. Try changing your filters.");
        } else {
            println!("No notes found. Create your first note!");
        }
        return;
    }

    for note in notes {
        print_note(note);
    }
}

fn print_note(note: &Note) {
    match &note.category {
        Some(category) => println!("#{} {}  [{}]", note.id, note.title, category.name),
        None => println!("#{} {}", note.id, note.title),
    }
    println!("    {}", preview(&note.content));
    println!(
        "    last updated {}",
        note.updated_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
    );
}

// Truncate long content for the card view.
fn preview(content: &str) -> String {
    if content.chars().count() > 150 {
        let cut: String = content.chars().take(150).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}

fn render_categories(controller: &Controller) {
    if controller.categories.is_empty() {
        println!("No categories yet.");
        return;
    }

    for category in &controller.categories {
        println!("#{} {}", category.id, category.name);
    }
}

fn render_form(controller: &Controller, editor: &impl ContentEditor) {
    let mode = match controller.form.mode {
        FormMode::Create => "Create New".to_string(),
        FormMode::Edit { id } => format!("Edit #{id}"),
    };
    println!("--- {mode} ---");
    println!("title:   {}", controller.form.title);
    println!("content: {}", preview(&editor.content()));
    match controller.form.category_id {
        Some(id) => println!("cat:     {id}"),
        None => println!("cat:     none"),
    }
}

fn parse_filter(input: &str) -> Result<Option<i64>, String> {
    match input {
        "all" | "none" | "" => Ok(None),
        _ => input
            .parse::<i64>()
            .map(Some)
            .map_err(|_| format!("expected a category id, 'all' or 'none', got '{input}'")),
    }
}

fn read_line() -> Option<String> {
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line),
    }
}

fn print_help() {
    println!("  list                show notes (with current filters)");
    println!("  search <text>       filter by title/content substring; 'search' clears");
    println!("  filter <id|all>     filter by category");
    println!("  cats                show categories");
    println!("  addcat <name>       create a category");
    println!("  new                 start a fresh note form");
    println!("  edit <id>           load a note into the form");
    println!("  title <text>        set the form title");
    println!("  content <text>      set the form content");
    println!("  cat <id|none>       set the form category");
    println!("  form                show the form");
    println!("  save                submit the form (create or update)");
    println!("  cancel              leave edit mode");
    println!("  delete <id>         delete a note (asks for confirmation)");
    println!("  reload              refetch notes and categories");
    println!("  quit                exit");
}
