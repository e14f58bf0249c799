//! Interactive console for arena-admin

use arena_admin::{
    AnnouncementDraft, ArenaConfig, ArenaEvent, ArenaSimulator, Command, Notification,
    SettingsPatch,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn print_notification(n: &Notification) {
    match &n.message {
        Some(msg) => println!("[{:?}] {}: {}", n.kind, n.title, msg),
        None => println!("[{:?}] {}", n.kind, n.title),
    }
}

fn parse_patch(arg: &str) -> Option<SettingsPatch> {
    let (key, value) = arg.split_once('=')?;
    let patch = SettingsPatch::new();
    match key.trim() {
        "blips" => value.trim().parse().ok().map(|v| patch.player_blips(v)),
        "restart" => value.trim().parse().ok().map(|v| patch.auto_restart(v)),
        "rotation" => value.trim().parse().ok().map(|v| patch.map_rotation(v)),
        "max" => value.trim().parse().ok().map(|v| patch.max_players(v)),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    println!("arena-admin console");
    println!("===================\n");

    let arena = ArenaSimulator::new(ArenaConfig::load_or_default());

    println!("Commands:");
    println!("  start | stop | reload");
    println!("  status - Show arena stats");
    println!("  players - List players");
    println!("  kick <id> - Kick a player");
    println!("  set <blips|restart|rotation|max>=<value> - Update a setting");
    println!("  announce <title>|<message> - Broadcast an announcement");
    println!("  preset <n> - Broadcast preset announcement 1-4");
    println!("  dump - Print the snapshot as JSON");
    println!("  q - Quit\n");

    loop {
        while let Some(event) = arena.try_recv().await {
            match event {
                ArenaEvent::StatusChanged(status) => println!("[Event] Status: {}", status),
                ArenaEvent::PlayerKicked(player) => println!("[Event] Kicked: {}", player.name),
                ArenaEvent::Announcement(a) => println!("[Event] Announcement: {}", a.title),
                _ => {}
            }
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, arg) = input.split_once(' ').unwrap_or((input, ""));

        match cmd {
            "start" => {
                println!("Starting...");
                let result = arena.start().await;
                print_notification(&Notification::for_command(Command::Start, &result));
            }
            "stop" => {
                println!("Stopping...");
                let result = arena.stop().await;
                print_notification(&Notification::for_command(Command::Stop, &result));
            }
            "reload" => {
                let result = arena.reload().await;
                print_notification(&Notification::for_command(Command::Reload, &result));
            }
            "status" => {
                let stats = arena.stats().await;
                println!(
                    "{} | players {} | zone {} | kills {} | uptime {}",
                    stats.status,
                    stats.player_count,
                    stats.zone_label(),
                    stats.total_kills,
                    stats.uptime
                );
                println!("{:?}", arena.settings().await);
            }
            "players" => {
                let players = arena.players().await;
                if players.is_empty() {
                    println!("No players");
                }
                for p in players {
                    println!("  #{:<4} {:<16} {:?} kills={}", p.id, p.name, p.status, p.kills);
                }
            }
            "kick" => match arg.trim().parse() {
                Ok(id) => {
                    let kicked = arena.kick_player(id).await;
                    print_notification(&Notification::for_kick(&kicked));
                }
                Err(_) => println!("Usage: kick <id>"),
            },
            "set" => match parse_patch(arg) {
                Some(patch) => {
                    let result = arena.update_settings(patch).await;
                    print_notification(&Notification::for_settings(&result));
                }
                None => println!("Usage: set <blips|restart|rotation|max>=<value>"),
            },
            "announce" => {
                let (title, message) = arg.split_once('|').unwrap_or((arg, ""));
                let result = arena.announce(AnnouncementDraft::new(title, message)).await;
                print_notification(&Notification::for_announcement(&result));
            }
            "preset" => {
                let presets = AnnouncementDraft::presets();
                match arg.trim().parse::<usize>().ok().and_then(|n| presets.get(n.wrapping_sub(1))) {
                    Some(draft) => {
                        let result = arena.announce(draft.clone()).await;
                        print_notification(&Notification::for_announcement(&result));
                    }
                    None => println!("Usage: preset <1-{}>", presets.len()),
                }
            }
            "dump" => println!("{}", arena.snapshot().await.to_json()?),
            "q" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Unknown command: {}", cmd),
        }
    }

    arena.shutdown().await;
    Ok(())
}
