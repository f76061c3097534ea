//! Catalog command handlers: search, detail, images, list toggles and
//! statistics.

use castellarium_core::{search, select, visited_stats, Castle};
use castellarium_store::{PersistOutcome, Tracker};

use crate::app::AppContext;
use crate::ListKind;

const NO_IMAGE: &str = "(no image)";

/// Marker column shown in listings: `V` visited, `W` wishlisted.
fn marker(tracker: &Tracker, id: &str) -> &'static str {
    if tracker.ids().is_visited(id) {
        "V"
    } else if tracker.ids().is_wishlisted(id) {
        "W"
    } else {
        "-"
    }
}

fn print_row(tracker: &Tracker, castle: &Castle) {
    println!(
        "{:<3}{:<14}{}  [{}]",
        marker(tracker, &castle.id),
        castle.id,
        castle.name,
        castle.location
    );
}

fn report_persist(outcome: &PersistOutcome) {
    match outcome {
        PersistOutcome::LocalOnly => {}
        PersistOutcome::Synced => println!("synced to your account"),
        PersistOutcome::Degraded { reason } => {
            eprintln!("warning: saved locally but not synced to your account: {reason}");
        }
    }
}

pub(crate) fn run_overview(ctx: &AppContext) {
    let ids = ctx.tracker.ids();
    println!("{} castles in the catalog", ctx.castles.len());
    println!(
        "{} visited, {} on the wishlist",
        ids.visited().len(),
        ids.wishlisted().len()
    );
    match ctx.tracker.session_user() {
        Some(user_id) => println!("signed in as {user_id}"),
        None => println!("not signed in"),
    }
}

/// Prints matching castles, optionally resolving an image for the first
/// `search_image_limit` of them concurrently.
pub(crate) async fn run_search(ctx: &AppContext, text: &str, images: bool) {
    let hits = search(&ctx.castles, text, ctx.config.search_limit);
    if hits.is_empty() {
        println!("no castle matches \"{}\"", text.trim());
        return;
    }

    let header = format!("{:<3}{:<14}NAME  [LOCATION]", "", "ID");
    println!("{header}");
    for castle in &hits {
        print_row(&ctx.tracker, castle);
    }
    if hits.len() == ctx.config.search_limit {
        eprintln!(
            "note: showing the first {} results; refine the search to see more",
            ctx.config.search_limit
        );
    }

    if images {
        let illustrated: Vec<&Castle> = hits
            .iter()
            .copied()
            .take(ctx.config.search_image_limit)
            .collect();
        let urls = futures::future::join_all(
            illustrated.iter().map(|castle| ctx.resolver.resolve(castle)),
        )
        .await;
        println!();
        for (castle, url) in illustrated.iter().zip(urls) {
            println!(
                "{:<14}{}",
                castle.id,
                url.as_deref().unwrap_or(NO_IMAGE)
            );
        }
    }
}

/// Prints every field of one castle, with its illustration and video.
///
/// # Errors
///
/// Returns an error if the id is unknown.
pub(crate) async fn run_show(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let castle = ctx.castle(id)?;
    let ids = ctx.tracker.ids();
    let status = if ids.is_visited(id) {
        "visited"
    } else if ids.is_wishlisted(id) {
        "on the wishlist"
    } else {
        "not visited"
    };

    println!("{}", castle.name);
    println!("id:        {}", castle.id);
    println!("location:  {}", castle.location);
    println!("era:       {}", castle.era);
    println!("region:    {}", castle.style);
    println!("status:    {status}");
    if let Some(position) = castle.coordinates {
        println!(
            "position:  {:.5}, {:.5}",
            position.latitude, position.longitude
        );
    }
    if let Some(video) = castle.video_embed_url() {
        println!("video:     {video}");
    }
    ctx.resolver
        .resolve_into(castle, |url| println!("image:     {url}"))
        .await;
    println!();
    println!("{}", castle.description);

    Ok(())
}

/// Resolves and prints the illustration of each requested castle.
///
/// # Errors
///
/// Returns an error if any id is unknown; nothing is looked up in that case.
pub(crate) async fn run_image(ctx: &AppContext, ids: &[String]) -> anyhow::Result<()> {
    let castles = ids
        .iter()
        .map(|id| ctx.castle(id))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let urls =
        futures::future::join_all(castles.iter().map(|castle| ctx.resolver.resolve(castle))).await;
    for (castle, url) in castles.iter().zip(urls) {
        println!("{:<14}{}", castle.id, url.as_deref().unwrap_or(NO_IMAGE));
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the id is unknown or local storage cannot be written.
pub(crate) async fn run_visit(ctx: &mut AppContext, id: &str) -> anyhow::Result<()> {
    let name = ctx.castle(id)?.name.clone();
    let outcome = ctx.tracker.toggle_visited(id).await?;
    if ctx.tracker.ids().is_visited(id) {
        println!("marked {name} as visited");
    } else {
        println!("removed {name} from visited");
    }
    report_persist(&outcome);
    Ok(())
}

/// # Errors
///
/// Returns an error if the id is unknown or local storage cannot be written.
pub(crate) async fn run_wish(ctx: &mut AppContext, id: &str) -> anyhow::Result<()> {
    let name = ctx.castle(id)?.name.clone();
    let outcome = ctx.tracker.toggle_wishlisted(id).await?;
    if ctx.tracker.ids().is_visited(id) {
        println!("{name} is already visited; un-visit it first to wishlist it");
    } else if ctx.tracker.ids().is_wishlisted(id) {
        println!("added {name} to the wishlist");
    } else {
        println!("removed {name} from the wishlist");
    }
    report_persist(&outcome);
    Ok(())
}

pub(crate) fn run_list(ctx: &AppContext, which: ListKind) {
    let ids = ctx.tracker.ids();
    let (label, castles) = match which {
        ListKind::Visited => ("visited", select(&ctx.castles, |id| ids.is_visited(id))),
        ListKind::Wishlist => ("wishlist", select(&ctx.castles, |id| ids.is_wishlisted(id))),
    };
    if castles.is_empty() {
        println!("{label} list is empty");
        return;
    }
    for castle in castles {
        print_row(&ctx.tracker, castle);
    }
}

pub(crate) fn run_stats(ctx: &AppContext) {
    let ids = ctx.tracker.ids();
    let stats = visited_stats(&ctx.castles, |id| ids.is_visited(id));
    println!("{} castles visited", stats.total);
    if stats.total == 0 {
        return;
    }

    println!();
    println!("BY ERA");
    for (era, count) in &stats.by_era {
        println!("{count:>5}  {era}");
    }
    println!();
    println!("BY REGION");
    for (style, count) in &stats.by_style {
        println!("{count:>5}  {style}");
    }
}
