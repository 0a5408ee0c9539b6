use approx::assert_relative_eq;
use cgmath::{Deg, InnerSpace, Vector3};
use gasket_demos::{
    camera::OrbitCamera,
    demos::hsr::{HsrConfig, build_cubes, scene_triangles},
    geometry::{
        gasket::{DEFAULT_CORNERS, chaos_game, in_triangle, subdivide},
        painter::{flatten, sort_back_to_front, update_depths},
        sphere::{triangle_count, uv_sphere_mesh},
    },
    pick::{NO_PICK, decode_pick_id, encode_pick_id},
};
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn chaos_game_points_lie_in_the_subdivided_gasket() {
    let points = chaos_game(DEFAULT_CORNERS, 2_000, &mut StdRng::seed_from_u64(42));
    let triangles = subdivide(DEFAULT_CORNERS, 3).unwrap();
    // the first few points have not converged onto the fractal yet
    for p in points.iter().skip(8) {
        let covered = triangles.chunks_exact(3).any(|tri| {
            in_triangle(*p, [tri[0], tri[1], tri[2]], 1e-4)
        });
        assert!(covered, "{p:?} is outside the gasket");
    }
}

#[test]
fn sphere_mesh_is_a_closed_triangle_list() {
    for depth in 0..5 {
        let mesh = uv_sphere_mesh(depth).unwrap();
        assert_eq!(Some(mesh.len()), triangle_count(depth).map(|n| 3 * n));
        for vertex in &mesh {
            let [x, y, z, w] = vertex.position;
            assert_relative_eq!(Vector3::new(x, y, z).magnitude(), 1.0, epsilon = 1e-5);
            assert_eq!(w, 1.0);
        }
    }
}

#[test]
fn painter_draws_the_cubes_nearest_to_the_camera_last() {
    let config = HsrConfig::default();
    let cubes = build_cubes(&config, &mut StdRng::seed_from_u64(7));
    let mut triangles = scene_triangles(&cubes);

    // the eye sits on +z, so the front layer of the grid is nearest
    let camera = OrbitCamera::new(5.0, Deg(0.0), Deg(0.0));
    update_depths(&mut triangles, &camera.look_at(), camera.translation);
    sort_back_to_front(&mut triangles);

    assert!(triangles.windows(2).all(|w| w[0].depth <= w[1].depth));
    let front = config.spacing;
    let last = triangles.last().expect("the scene has triangles");
    assert_relative_eq!(last.transform.translation.z, front);
    let first = triangles.first().expect("the scene has triangles");
    assert_relative_eq!(first.transform.translation.z, -front);

    let vertices = flatten(&triangles, [1.0; 3]);
    assert_eq!(vertices.len(), 3 * triangles.len());
    for (vertex, triangle) in vertices.chunks_exact(3).zip(&triangles) {
        assert!(vertex.iter().all(|v| v.pick_id == triangle.object_id));
        assert_ne!(vertex[0].pick_id, NO_PICK);
    }
}

#[test]
fn every_cube_id_survives_the_pick_texture() {
    let cubes = build_cubes(&HsrConfig::default(), &mut StdRng::seed_from_u64(0));
    for cube in cubes {
        assert_eq!(decode_pick_id(encode_pick_id(cube.id)), cube.id);
    }
}
