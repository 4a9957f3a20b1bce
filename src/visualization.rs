//! Interactive 3D view of the home screen using kiss3d.
//!
//! Right-button drags are mapped from window pixels onto the 390 × 844 screen
//! layout and fed through the gesture router; left-button drags orbit the
//! camera as usual.

use std::hash::{Hash, Hasher};

use kiss3d::event::{Action, MouseButton, WindowEvent};
use kiss3d::prelude::*;
use rustc_hash::FxHasher;

use twister::layout::{Scene, SCREEN_HEIGHT, SCREEN_WIDTH};
use twister::{Face, Point};

/// Size of each rendered element (slightly smaller than 1.0 for visible gaps).
const ELEMENT_SIZE: f32 = 0.9;
/// Height the camera looks at, so the stacked objects sit mid-window.
const LOOK_HEIGHT: f32 = 10.15;

/// Stable display color for a material name.
fn material_color(name: &str) -> Color {
    match name {
        "black" => Color::new(0.1, 0.1, 0.1, 1.0),
        "white" => Color::new(0.95, 0.95, 0.95, 1.0),
        _ => {
            let mut hasher = FxHasher::default();
            name.hash(&mut hasher);
            let bits = hasher.finish();
            let channel = |shift: u32| 0.25 + ((bits >> shift) & 0xff) as f32 / 340.0;
            Color::new(channel(0), channel(8), channel(16), 1.0)
        }
    }
}

/// One drawn element: which object and element it mirrors.
struct RenderedElement {
    node: SceneNode3d,
    object: usize,
    element: usize,
}

fn build_nodes(root: &mut SceneNode3d, scene: &Scene) -> Vec<RenderedElement> {
    let mut rendered = Vec::new();
    for (object_index, (kind, object)) in scene.objects.iter().enumerate() {
        let size = ELEMENT_SIZE * kind.object_layout().placement.scale as f32;
        for element_index in 0..object.elements().len() {
            let node = root.add_cube(size, size, size);
            rendered.push(RenderedElement {
                node,
                object: object_index,
                element: element_index,
            });
        }
    }
    rendered
}

/// Moves and recolors every node to match the lattice state.
fn sync_nodes(rendered: &mut [RenderedElement], scene: &Scene) {
    let snapshots: Vec<_> = scene
        .objects
        .iter()
        .map(|(kind, object)| {
            // renderer-side animation is not modeled, so events are only drained
            let _ = object.drain_events();
            (kind.object_layout().placement, object.elements(), object.element_centers())
        })
        .collect();

    for cube in rendered {
        let (placement, elements, centers) = &snapshots[cube.object];
        let [x, y, z] = centers[cube.element];
        let scale = placement.scale;
        let position = Vec3::new(
            (placement.position[0] + x * scale) as f32,
            (placement.position[1] + y * scale) as f32 - LOOK_HEIGHT,
            (placement.position[2] + z * scale) as f32,
        );
        let face = elements[cube.element].face(Face::Front);
        cube.node.set_color(material_color(face));
        cube.node.set_position(position);
    }
}

/// Opens the viewer on `scene` and blocks until the window closes.
pub fn display(scene: Scene) {
    pollster::block_on(display_async(scene));
}

async fn display_async(mut scene: Scene) {
    let mut window = Window::new("Twister - [Right drag] twist, [Left drag] orbit").await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(14.0);

    let mut root = SceneNode3d::empty();
    root.add_light(Light::point(100.0))
        .set_position(Vec3::new(0.0, 5.0, 15.0));

    let mut rendered = build_nodes(&mut root, &scene);

    let mut cursor = Point::default();
    let mut gesture_start: Option<Point> = None;

    loop {
        let (width, height) = (window.width() as f64, window.height() as f64);
        for event in window.events().iter() {
            match event.value {
                WindowEvent::CursorPos(x, y, _) => {
                    cursor = Point::new(x / width * SCREEN_WIDTH, y / height * SCREEN_HEIGHT);
                    if let Some(start) = gesture_start {
                        if let Err(e) = scene.router.on_changed(start, cursor) {
                            eprintln!("drag update rejected: {}", e);
                        }
                    }
                }
                WindowEvent::MouseButton(MouseButton::Button2, Action::Press, _) => {
                    gesture_start = Some(cursor);
                }
                WindowEvent::MouseButton(MouseButton::Button2, Action::Release, _) => {
                    gesture_start = None;
                    if let Err(e) = scene.router.on_ended() {
                        eprintln!("drag end rejected: {}", e);
                    }
                }
                _ => {}
            }
        }

        sync_nodes(&mut rendered, &scene);

        if !window.render_3d(&mut root, &mut camera).await {
            break;
        }
    }
}

