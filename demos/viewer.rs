use flexi_logger::{DeferredNow, Logger};
use log::{error, Record};
use macroquad::prelude::*;
use room_map_viewer::{MacroquadSource, MapData, MapLoader, MapPainter, ViewController, ViewerConfig};

fn window_conf() -> Conf {
    Conf {
        window_title: "Room Map".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn log_format(w: &mut dyn std::io::Write, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
    write!(
        w,
        "{} {:5} [{}] {}",
        now.format("%H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("<unknown>"),
        record.args()
    )
}

async fn load(cfg: &ViewerConfig) -> MapData {
    let loader = MapLoader::new(MacroquadSource::new(cfg.map_root.as_str()), cfg.batch_size);
    if let Some(bulk) = &cfg.bulk_file {
        match loader.load_bulk(bulk).await {
            Ok(data) => return data,
            Err(err) => error!("{err}; falling back to per-room loading"),
        }
    }
    loader.load_world().await
}

#[macroquad::main(window_conf)]
async fn main() {
    let _logger = Logger::try_with_env_or_str("info")
        .expect("Invalid log spec")
        .format(log_format)
        .start()
        .expect("Unable to init logger");

    let cfg = match std::env::args().nth(1) {
        Some(path) => ViewerConfig::load(path).expect("Failed to load viewer config"),
        None => ViewerConfig::default(),
    };

    let mut data = load(&cfg).await;
    let mut painter = MapPainter::new();
    let mut view = ViewController::new(cfg.default_view(), cfg.limits(), cfg.reset_padding);
    let viewport = || vec2(screen_width(), screen_height());
    view.reset(data.index(), viewport());

    let mut press: Option<Vec2> = None;

    loop {
        let mouse = Vec2::from(mouse_position());

        if is_mouse_button_pressed(MouseButton::Left) {
            press = Some(mouse);
            view.pointer_down(mouse, viewport(), data.index());
        }
        if is_mouse_button_down(MouseButton::Left) {
            view.pointer_move(mouse, viewport());
        }
        if is_mouse_button_released(MouseButton::Left) {
            // A press that barely moved is a click.
            if press.is_some_and(|p| p.distance(mouse) < 4.0) {
                let world = view.rect.screen_to_world(mouse, viewport());
                data.select_at(world);
            }
            press = None;
            view.pointer_up();
        }

        let wheel = mouse_wheel().1;
        if wheel != 0.0 {
            view.wheel(mouse, wheel.signum(), viewport());
        }
        if is_key_pressed(KeyCode::R) {
            view.reset(data.index(), viewport());
        }
        if is_key_pressed(KeyCode::Escape) {
            data.clear_selection();
        }

        clear_background(Color::from_rgba(0x0d, 0x0d, 0x0d, 255));
        painter.draw(&data, &view.rect);

        let hover = data
            .room_at(view.rect.screen_to_world(mouse, viewport()))
            .map(|r| r.key.to_string())
            .unwrap_or_default();
        draw_text(&hover, 10.0, screen_height() - 12.0, 22.0, GRAY);

        if let Some(room) = data.selected() {
            let info = format!(
                "{} ({}x{} at {},{}), {} connections",
                room.full_name.as_deref().unwrap_or(&room.name),
                room.width,
                room.height,
                room.position.x,
                room.position.y,
                room.geometry_lines.len()
            );
            draw_text(&info, 10.0, 24.0, 24.0, YELLOW);
        }

        draw_text(
            &format!("FPS: {}  rooms: {}", get_fps(), data.index().len()),
            screen_width() - 260.0,
            24.0,
            22.0,
            RED,
        );

        next_frame().await;
    }
}
