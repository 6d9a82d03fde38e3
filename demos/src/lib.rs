//! Example command trees.

use star_core::{Command, Context, Param, parse_string};
use tracing::info;

/// A directory with `create`, `read`, `update` and `delete` children that
/// print what they would do. All but `create` take an `id` positional.
pub fn crud() -> Command {
    let id = Param::string("id").with_short_doc("entity id");
    let value = Param::optional("value", parse_string).with_short_doc("new value");

    Command::directory("an example CLI app")
        .with_child(
            "create",
            Command::new(|ctx| {
                info!("creating entity");
                writeln!(ctx.stdout(), "CREATE")?;
                Ok(())
            })
            .with_short("creates a new entity"),
        )
        .with_child(
            "read",
            by_id(&id, "READ").with_short("reads the value of an entity"),
        )
        .with_child(
            "update",
            Command::new({
                let (id, value) = (id.clone(), value.clone());
                move |ctx| {
                    let id = id.load(ctx);
                    match value.load_opt(ctx) {
                        Some(value) => writeln!(ctx.stdout(), "UPDATE {id} {value}")?,
                        None => writeln!(ctx.stdout(), "UPDATE {id}")?,
                    }
                    Ok(())
                }
            })
            .with_short("update the value of an entity")
            .with_positional(id.clone())
            .with_flag(value),
        )
        .with_child(
            "delete",
            by_id(&id, "DELETE").with_short("delete an entity by id"),
        )
}

fn by_id(id: &Param<String>, verb: &'static str) -> Command {
    let param = id.clone();
    Command::new(move |ctx: &mut Context<'_>| {
        let id = param.load(ctx);
        info!(id = %id, verb, "entity operation");
        writeln!(ctx.stdout(), "{verb} {id}")?;
        Ok(())
    })
    .with_positional(id.clone())
}
