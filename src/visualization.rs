//! Interactive 3D viewer using kiss3d.

use std::time::Instant;

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use futures::Future;
use kiss3d::event::{Action, Key, Modifiers, WindowEvent};
use kiss3d::prelude::*;
use strum::IntoEnumIterator;

use rubik::catalog::CATALOG;
use rubik::geometry::Transform;
use rubik::{Cube, Face};

const TITLE: &str = "Rubik's Cube - [F B U D L R M E S] turn, [Arrows] rotate, \
                     [Return] next algorithm, [Space] solve, [Backspace] reset";

/// Edge length of a piece body, slightly under the layer spacing for gaps.
const BODY_SIZE: f32 = 0.94;
const STICKER_SIZE: f32 = 0.82;
const STICKER_THICKNESS: f32 = 0.02;

/// Sticker color for the face a piece started on.
///
/// The mapping is fixed so a solved cube always looks the same.
fn face_color(face: Face) -> Color {
    match face {
        Face::Up => Color::new(1.0, 1.0, 1.0, 1.0),    // white
        Face::Down => Color::new(1.0, 0.85, 0.1, 1.0), // yellow
        Face::Front => Color::new(0.1, 0.7, 0.2, 1.0), // green
        Face::Back => Color::new(0.1, 0.3, 0.9, 1.0),  // blue
        Face::Right => Color::new(0.85, 0.1, 0.1, 1.0), // red
        Face::Left => Color::new(1.0, 0.5, 0.1, 1.0),  // orange
    }
}

fn scene_vec(v: glam::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn scene_quat(q: glam::Quat) -> Quat {
    Quat::from_xyzw(q.x, q.y, q.z, q.w)
}

/// Adds one group node per piece, stickered by where the piece is now.
fn build_scene(scene: &mut SceneNode3d, cube: &Cube) -> Vec<SceneNode3d> {
    cube.with_model(|model| {
        let spacing = rubik::grid::layer_spacing(model);
        (0..model.pieces().len())
            .map(|id| {
                let home = (model.world_position(id) - model.center()) / spacing;
                let mut group = scene.add_group();
                group
                    .add_cube(BODY_SIZE * spacing, BODY_SIZE * spacing, BODY_SIZE * spacing)
                    .set_color(Color::new(0.08, 0.08, 0.08, 1.0));

                for face in Face::iter() {
                    let normal = face.normal();
                    if normal.dot(home) < 0.5 {
                        continue;
                    }
                    let extent = |n: f32| {
                        if n == 0.0 {
                            STICKER_SIZE * spacing
                        } else {
                            STICKER_THICKNESS * spacing
                        }
                    };
                    group
                        .add_cube(extent(normal.x), extent(normal.y), extent(normal.z))
                        .set_color(face_color(face))
                        .set_position(scene_vec(normal * (BODY_SIZE * spacing / 2.0)));
                }
                group
            })
            .collect()
    })
}

/// Moves every piece node to the piece's current world transform.
fn sync_scene(nodes: &mut [SceneNode3d], transforms: &[Transform]) {
    for (node, transform) in nodes.iter_mut().zip(transforms) {
        node.set_position(scene_vec(transform.translation));
        node.set_rotation(scene_quat(transform.rotation));
    }
}

/// Opens the viewer and runs until the window is closed.
pub fn play(cube: Cube) {
    pollster::block_on(play_async(cube));
}

async fn play_async(cube: Cube) {
    let mut window = Window::new(TITLE).await;

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(9.0);

    let mut scene = SceneNode3d::empty();
    scene
        .add_light(Light::point(100.0))
        .set_position(Vec3::new(5.0, 6.0, 7.0));

    let mut nodes = build_scene(&mut scene, &cube);

    // cube operations are futures; they run here, one poll per frame
    let mut pool = LocalPool::new();
    let mut next_algorithm = 0;
    let mut last_frame = Instant::now();
    // title to show once this frame's events are handled
    let mut new_title = None;

    loop {
        for event in window.events().iter() {
            if let WindowEvent::Key(key, Action::Press, modifiers) = event.value {
                let reverse = modifiers.contains(Modifiers::Shift);
                match key {
                    Key::Return => {
                        if cube.is_busy() || cube.is_resetting() {
                            log::info!("still turning; try again when the cube is idle");
                            continue;
                        }
                        let algorithm = &CATALOG[next_algorithm];
                        next_algorithm = (next_algorithm + 1) % CATALOG.len();
                        new_title = Some(format!("{} - {}", algorithm.name, algorithm.moves));
                        let set_up = cube.set_up(algorithm.moves);
                        spawn(&pool, async move {
                            set_up.await;
                        });
                    }
                    Key::Space => {
                        if cube.can_solve() {
                            let solve = cube.solve();
                            spawn(&pool, async move {
                                solve.await;
                            });
                        }
                    }
                    Key::Back => {
                        new_title = Some(TITLE.to_owned());
                        let reset = cube.reset_cube();
                        spawn(&pool, async move {
                            if let Err(e) = reset.await {
                                log::error!("reset failed: {e}");
                            }
                        });
                    }
                    _ => {
                        if let Some(token) = key_token(key, reverse) {
                            let duration = if matches!(key, Key::Up | Key::Down | Key::Left | Key::Right) {
                                cube.config().cube_turn()
                            } else {
                                cube.config().turn()
                            };
                            let turn = cube.execute_move(&token, duration);
                            spawn(&pool, async move {
                                if let Err(e) = turn.await {
                                    log::warn!("{token}: {e}");
                                }
                            });
                        }
                    }
                }
            }
        }

        if let Some(title) = new_title.take() {
            window.set_title(&title);
        }

        let now = Instant::now();
        pool.run_until_stalled();
        cube.advance(now - last_frame);
        pool.run_until_stalled();
        last_frame = now;

        let transforms = cube.piece_transforms();
        if transforms.len() != nodes.len() {
            for mut node in nodes.drain(..) {
                node.remove();
            }
            nodes = build_scene(&mut scene, &cube);
        }
        sync_scene(&mut nodes, &transforms);

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }
}

fn spawn(pool: &LocalPool, future: impl Future<Output = ()> + 'static) {
    if let Err(e) = pool.spawner().spawn_local(future) {
        log::error!("could not start cube task: {e}");
    }
}

/// Move token for a key press, if the key turns anything.
fn key_token(key: Key, reverse: bool) -> Option<String> {
    let letter = match key {
        Key::F => 'F',
        Key::B => 'B',
        Key::U => 'U',
        Key::D => 'D',
        Key::L => 'L',
        Key::R => 'R',
        Key::M => 'M',
        Key::E => 'E',
        Key::S => 'S',
        // arrows spin the whole cube; left/right about y, up/down about x
        Key::Left => return Some("y".to_owned()),
        Key::Right => return Some("y'".to_owned()),
        Key::Up => return Some("x".to_owned()),
        Key::Down => return Some("x'".to_owned()),
        _ => return None,
    };
    Some(if reverse {
        format!("{letter}'")
    } else {
        letter.to_string()
    })
}
