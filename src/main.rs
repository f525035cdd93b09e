// disable console on windows for release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use aurora_globe::{
    ActiveFilter, Category, CategoryFilter, CursorRequest, Dataset, DeviceClass, GlobeConfig, GlobeHover, GlobePlugin,
    GlobeState,
};
use bevy::DefaultPlugins;
use bevy::prelude::*;
use bevy::window::{CursorIcon, PresentMode, PrimaryWindow, SystemCursorIcon, WindowResolution};
use globekit::config::DEFAULT_CONFIG_PATH;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

const HUBS: &str = include_str!("../assets/data/hubs.toml");
const RENDER_FAILURE: &str = "Failed to render 3D globe. Check console for details.";

/// Problems found before the app existed; logged once logging is up.
#[derive(Resource, Default)]
struct StartupReport {
    warnings: Vec<String>,
    failure: Option<String>,
}

#[derive(Component)]
struct HoverLabel;

fn main() {
    let mut report = StartupReport::default();
    let device = detect_device(&mut report);
    let config = GlobeConfig::load_from_file(DEFAULT_CONFIG_PATH).unwrap_or_else(|err| {
        report
            .warnings
            .push(format!("Using default globe config, {DEFAULT_CONFIG_PATH} not loaded: {err}"));
        GlobeConfig::default()
    });
    let dataset = Dataset::from_toml_str(HUBS).map_err(|err| err.to_string());

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(config, dataset, device, report)));
    if outcome.is_err() {
        error!("{RENDER_FAILURE}");
        eprintln!("{RENDER_FAILURE}");
    }
}

fn detect_device(report: &mut StartupReport) -> DeviceClass {
    match std::env::var("AURORA_DEVICE") {
        Ok(value) => DeviceClass::from_str(&value).unwrap_or_else(|err| {
            report.warnings.push(format!("Ignoring AURORA_DEVICE: {err}"));
            DeviceClass::default()
        }),
        Err(_) if cfg!(any(target_os = "android", target_os = "ios")) => DeviceClass::Mobile,
        Err(_) => DeviceClass::Desktop,
    }
}

fn run(config: GlobeConfig, dataset: Result<Dataset, String>, device: DeviceClass, mut report: StartupReport) {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Aurora Globe".into(),
            resolution: WindowResolution::new(1500, 900),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }));

    match dataset {
        Ok(dataset) => {
            app.add_plugins(GlobePlugin {
                config,
                dataset,
                device,
            })
            .add_systems(Startup, (spawn_hover_label, mount_globe))
            .add_systems(
                Update,
                (
                    select_filter,
                    toggle_mount,
                    show_hover.run_if(on_message::<GlobeHover>),
                ),
            );
        }
        Err(err) => {
            report.failure = Some(err);
            app.add_systems(Startup, show_render_failure);
        }
    }

    app.insert_resource(report)
        .add_systems(Startup, log_startup_report)
        .run();
}

fn log_startup_report(report: Res<StartupReport>) {
    for warning in &report.warnings {
        warn!("{warning}");
    }
    if let Some(failure) = &report.failure {
        error!("Globe dataset rejected: {failure}");
    }
}

fn show_render_failure(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        children![(
            Text::new(RENDER_FAILURE),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(Color::srgb(0.6, 0.6, 0.65)),
        )],
    ));
}

fn mount_globe(mut next_state: ResMut<NextState<GlobeState>>) {
    next_state.set(GlobeState::Mounted);
}

fn toggle_mount(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<State<GlobeState>>,
    mut next_state: ResMut<NextState<GlobeState>>,
) {
    if !keys.just_pressed(KeyCode::KeyM) {
        return;
    }
    next_state.set(match state.get() {
        GlobeState::Mounted => GlobeState::Unmounted,
        GlobeState::Unmounted => GlobeState::Mounted,
    });
}

fn select_filter(keys: Res<ButtonInput<KeyCode>>, mut filter: ResMut<ActiveFilter>) {
    let selection = [
        (KeyCode::Digit0, CategoryFilter::All),
        (KeyCode::Digit1, CategoryFilter::Only(Category::Frontend)),
        (KeyCode::Digit2, CategoryFilter::Only(Category::Backend)),
        (KeyCode::Digit3, CategoryFilter::Only(Category::Ai)),
        (KeyCode::Digit4, CategoryFilter::Only(Category::Web3)),
    ]
    .into_iter()
    .find(|(key, _)| keys.just_pressed(*key));

    if let Some((_, next)) = selection
        && **filter != next
    {
        info!("Category filter: {next:?}");
        **filter = next;
    }
}

fn spawn_hover_label(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::WHITE),
        BackgroundColor(Color::srgba(0.02, 0.03, 0.07, 0.85)),
        Node {
            position_type: PositionType::Absolute,
            padding: UiRect::all(Val::Px(6.0)),
            ..default()
        },
        Visibility::Hidden,
        HoverLabel,
    ));
}

fn show_hover(
    mut commands: Commands,
    mut hover_events: MessageReader<GlobeHover>,
    window_q: Query<Entity, With<PrimaryWindow>>,
    mut label_q: Query<(&mut Text, &mut Node, &mut Visibility), With<HoverLabel>>,
) {
    let Some(hover) = hover_events.read().last() else {
        return;
    };

    if let Ok(window) = window_q.single() {
        match hover.cursor {
            CursorRequest::Pointer => {
                commands
                    .entity(window)
                    .insert(CursorIcon::from(SystemCursorIcon::Pointer));
            }
            CursorRequest::Default => {
                commands
                    .entity(window)
                    .insert(CursorIcon::from(SystemCursorIcon::Default));
            }
            CursorRequest::Unchanged => {}
        }
    }

    let Ok((mut text, mut node, mut visibility)) = label_q.single_mut() else {
        return;
    };
    match (&hover.point, hover.screen) {
        (Some(point), Some(screen)) => {
            info!("Hovering {} ({}) at {:.0}x{:.0}", point.city, point.category, screen.x, screen.y);
            text.0 = format!(
                "{} {}, {}\n{}\n{} developers, {:+.1}%",
                point.flag, point.city, point.country, point.label, point.developers, point.trend
            );
            node.left = Val::Px(screen.x + 12.0);
            node.top = Val::Px(screen.y + 12.0);
            *visibility = Visibility::Inherited;
        }
        _ => {
            *visibility = Visibility::Hidden;
        }
    }
}
