//! End-to-end properties of the pipeline: coverage, interpolation, depth,
//! degenerate input and texture wrapping.

use rstest::rstest;
use softpipe::effects::{CameraTextured, DepthTextured, Gradient};
use softpipe::rasterizer::{
    render_mesh, shapes, DepthBuffer, DrawCall, Filter, Framebuffer, Mat4, Mesh, RenderTarget,
    Texture, TriangleSetup, Vec2, Vec3, Wrap,
};

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Gradient mesh (`x y r g b`) from positions and colors
fn gradient_mesh(corners: &[([f32; 2], [f32; 3])], triangles: &[[usize; 3]]) -> Mesh {
    let mut mesh = Mesh::new(5);
    for (p, rgb) in corners {
        mesh.push_vertex(&[p[0], p[1], rgb[0], rgb[1], rgb[2]]);
    }
    for tri in triangles {
        mesh.push_triangle(tri[0], tri[1], tri[2]);
    }
    mesh
}

fn draw_gradient(mesh: &Mesh, fb: &mut Framebuffer) -> usize {
    let program = Gradient::new().unwrap();
    let unif = program.uniforms(WHITE);
    let call = DrawCall::new(&program, &unif, &[]).unwrap();
    let mut target = RenderTarget::new(fb);
    render_mesh(mesh, &call, &mut target).unwrap().fragments
}

/// Fresh framebuffers are all zero; every written pixel is opaque
fn lit(fb: &Framebuffer, x: usize, y: usize) -> bool {
    fb.get_pixel(x, y).to_bytes()[3] == 255
}

#[rstest]
#[case(2.0, 14.0, 3.0, 11.0)]
#[case(1.5, 13.5, 2.25, 12.75)]
#[case(0.3, 15.7, 0.6, 9.1)]
fn two_triangles_tile_a_rectangle_exactly(
    #[case] left: f32,
    #[case] right: f32,
    #[case] bottom: f32,
    #[case] top: f32,
) {
    let corners = [
        ([left, bottom], WHITE),
        ([right, bottom], WHITE),
        ([right, top], WHITE),
        ([left, top], WHITE),
    ];
    let lower = gradient_mesh(&corners, &[[0, 1, 2]]);
    let upper = gradient_mesh(&corners, &[[0, 2, 3]]);

    let mut fb_lower = Framebuffer::new(16, 16);
    let mut fb_upper = Framebuffer::new(16, 16);
    let written = draw_gradient(&lower, &mut fb_lower) + draw_gradient(&upper, &mut fb_upper);

    let cols = left.ceil() as usize..right.ceil() as usize;
    let rows = bottom.ceil() as usize..top.ceil() as usize;
    for y in 0..16 {
        for x in 0..16 {
            let inside = cols.contains(&x) && rows.contains(&y);
            let hits = lit(&fb_lower, x, y) as usize + lit(&fb_upper, x, y) as usize;
            assert_eq!(hits, inside as usize, "pixel ({x}, {y})");
        }
    }
    assert_eq!(written, cols.len() * rows.len());
}

#[test]
fn triangle_fan_never_draws_a_pixel_twice() {
    let mesh = shapes::ellipse(15.3, 14.7, 11.2, 9.6, 13).unwrap();
    let mut colored = Mesh::new(5);
    for i in 0..mesh.vertex_count() {
        let v = mesh.vertex(i);
        colored.push_vertex(&[v[0], v[1], 1.0, 1.0, 1.0]);
    }
    for tri in mesh.triangles() {
        colored.push_triangle(tri[0], tri[1], tri[2]);
    }

    let mut fb = Framebuffer::new(32, 32);
    let fragments = draw_gradient(&colored, &mut fb);
    let distinct = (0..32)
        .flat_map(|y| (0..32).map(move |x| (x, y)))
        .filter(|&(x, y)| lit(&fb, x, y))
        .count();
    assert_eq!(fragments, distinct);
    assert!(lit(&fb, 15, 15));
}

#[test]
fn interpolation_recovers_corner_varyings() {
    let (a, b, c) = (Vec2::new(1.25, 0.5), Vec2::new(9.0, 2.75), Vec2::new(3.5, 8.0));
    let (va, vb, vc) = ([1.0, 0.0, 0.25], [0.0, 1.0, 0.5], [0.0, 0.0, 1.0]);
    let setup = TriangleSetup::new(a, b, c).unwrap();
    for (p, expected) in [(a, va), (b, vb), (c, vc)] {
        let mut out = [0.0; 3];
        setup.interpolate(p.x, p.y, &va, &vb, &vc, &mut out);
        for k in 0..3 {
            assert!((out[k] - expected[k]).abs() < 1e-5, "{out:?} != {expected:?}");
        }
    }
}

#[test]
fn right_triangle_gradient() {
    let mesh = gradient_mesh(
        &[
            ([0.0, 0.0], [1.0, 0.0, 0.0]),
            ([10.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 10.0], [0.0, 0.0, 1.0]),
        ],
        &[[0, 1, 2]],
    );
    let mut fb = Framebuffer::new(10, 10);
    draw_gradient(&mesh, &mut fb);

    // The corner pixel carries the corner color unchanged
    assert_eq!(fb.get_pixel(0, 0).to_bytes(), [255, 0, 0, 255]);

    // (5, 2) is 0.3 red + 0.5 green + 0.2 blue
    let rgb = fb.get_pixel(5, 2).to_rgb_f32();
    for (got, want) in rgb.iter().zip([0.3, 0.5, 0.2]) {
        assert!((got - want).abs() <= 1.0 / 255.0, "{rgb:?}");
    }
    assert!(rgb[1] > rgb[2]);

    // (1, 8) leans toward blue
    let [_, g, b, _] = fb.get_pixel(1, 8).to_bytes();
    assert!(b > g);

    // The hypotenuse x + y = 10 belongs to the neighbouring triangle
    assert!(!lit(&fb, 9, 1));
    assert!(lit(&fb, 9, 0));
}

/// Square in the plane `z = z0 + slope * x`, attributes `xyz st n`
fn slanted_square(size: f32, z0: f32, slope: f32) -> Mesh {
    let mut mesh = Mesh::new(8);
    for (x, y) in [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)] {
        mesh.push_vertex(&[x, y, z0 + slope * x, x / size, y / size, 0.0, 0.0, 1.0]);
    }
    mesh.push_triangle(0, 1, 2);
    mesh.push_triangle(0, 2, 3);
    mesh
}

fn draw_depth_scene(order: &[(&Mesh, &Texture)]) -> (Framebuffer, DepthBuffer) {
    let program = DepthTextured::new().unwrap();
    let unif = program.uniforms(WHITE, &Mat4::IDENTITY);
    let mut fb = Framebuffer::new(20, 20);
    let mut depth = DepthBuffer::new(20, 20);
    {
        let mut target = RenderTarget::new(&mut fb).with_depth(&mut depth);
        for (mesh, tex) in order {
            let textures = [*tex];
            let call = DrawCall::new(&program, &unif, &textures).unwrap();
            render_mesh(mesh, &call, &mut target).unwrap();
        }
    }
    (fb, depth)
}

#[test]
fn depth_resolves_independent_of_submission_order() {
    let flat = slanted_square(20.0, 0.5, 0.0);
    let tilted = slanted_square(20.0, -1.013, 0.2);
    let red = Texture::solid([1.0, 0.0, 0.0]);
    let blue = Texture::solid([0.0, 0.0, 1.0]);

    let (fb_ab, _) = draw_depth_scene(&[(&flat, &red), (&tilted, &blue)]);
    let (fb_ba, _) = draw_depth_scene(&[(&tilted, &blue), (&flat, &red)]);
    assert_eq!(fb_ab.pixels, fb_ba.pixels);

    // Depth is -z: the tilted square is behind on the left, in front on
    // the right, crossing where -1.013 + 0.2x = 0.5
    assert_eq!(fb_ab.get_pixel(2, 10).to_bytes(), [255, 0, 0, 255]);
    assert_eq!(fb_ab.get_pixel(17, 10).to_bytes(), [0, 0, 255, 255]);
}

#[test]
fn front_and_back_meshes_render_the_same_either_way() {
    let front = slanted_square(12.0, 2.0, 0.0);
    let back = slanted_square(16.0, -3.0, 0.0);
    let green = Texture::solid([0.0, 1.0, 0.0]);
    let gray = Texture::solid([0.5, 0.5, 0.5]);

    let (back_to_front, depth) = draw_depth_scene(&[(&back, &gray), (&front, &green)]);
    let (front_to_back, _) = draw_depth_scene(&[(&front, &green), (&back, &gray)]);
    assert_eq!(back_to_front.pixels, front_to_back.pixels);
    assert_eq!(back_to_front.get_pixel(5, 5).to_bytes(), [0, 255, 0, 255]);
    assert_eq!(back_to_front.get_pixel(14, 14).to_bytes(), [128, 128, 128, 255]);
    assert_eq!(depth.get(5, 5), Some(-2.0));
}

#[rstest]
#[case([[3.0, 3.0], [3.0, 3.0], [9.0, 7.0]])]
#[case([[4.0, 4.0], [4.0, 4.0], [4.0, 4.0]])]
#[case([[1.0, 1.0], [5.0, 5.0], [9.0, 9.0]])]
#[case([[f32::NAN, 1.0], [5.0, 2.0], [3.0, 9.0]])]
#[case([[f32::INFINITY, 1.0], [5.0, 2.0], [3.0, 9.0]])]
fn degenerate_triangles_write_nothing(#[case] positions: [[f32; 2]; 3]) {
    let corners: Vec<_> = positions.iter().map(|&p| (p, WHITE)).collect();
    let mesh = gradient_mesh(&corners, &[[0, 1, 2]]);

    let program = Gradient::new().unwrap();
    let unif = program.uniforms(WHITE);
    let call = DrawCall::new(&program, &unif, &[]).unwrap();
    let mut fb = Framebuffer::new(12, 12);
    let stats = render_mesh(&mesh, &call, &mut RenderTarget::new(&mut fb)).unwrap();

    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.fragments, 0);
    assert!(fb.pixels.iter().all(|&byte| byte == 0));
}

#[test]
fn vertices_at_infinity_are_skipped() {
    // A zero camera matrix sends every vertex to w = 0
    let program = CameraTextured::new().unwrap();
    let unif = program.uniforms(WHITE, &Mat4::IDENTITY, &Mat4::ZERO, Vec3::Z, 0.5);
    let tex = Texture::solid(WHITE);
    let textures = [&tex];
    let call = DrawCall::new(&program, &unif, &textures).unwrap();

    let mesh = shapes::cuboid(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0).unwrap();
    let mut fb = Framebuffer::new(8, 8);
    let mut depth = DepthBuffer::new(8, 8);
    let mut target = RenderTarget::new(&mut fb).with_depth(&mut depth);
    let stats = render_mesh(&mesh, &call, &mut target).unwrap();
    assert_eq!(stats.skipped, stats.triangles);
    assert_eq!(stats.fragments, 0);
}

fn stripes() -> Texture {
    let texels = (0..4).flat_map(|i| [i as f32 / 3.0, 0.0, 1.0 - i as f32 / 3.0]).collect();
    Texture::from_texels(4, 1, 3, texels).unwrap()
}

#[rstest]
fn repeat_is_periodic(#[values(Filter::Nearest, Filter::Linear)] filter: Filter) {
    let mut tex = stripes();
    tex.set_filter(filter);
    tex.set_wrap(Wrap::Repeat, Wrap::Repeat);
    assert_eq!(tex.sample(0.0, 0.0), tex.sample(1.0, 0.0));
    assert_eq!(tex.sample(0.0, 0.0), tex.sample(-2.0, 0.0));
    let (a, b) = (tex.sample(0.4, 0.0), tex.sample(1.4, 0.0));
    for k in 0..4 {
        assert!((a[k] - b[k]).abs() < 1e-5);
    }
}

#[rstest]
fn clamp_holds_the_edge_texel(#[values(Filter::Nearest, Filter::Linear)] filter: Filter) {
    let mut tex = stripes();
    tex.set_filter(filter);
    tex.set_wrap(Wrap::Clamp, Wrap::Clamp);
    assert_eq!(tex.sample(-1.0, 0.0), tex.sample(0.0, 0.0));
    assert_eq!(tex.sample(7.5, 0.0), tex.sample(1.0, 0.0));
    assert_eq!(tex.sample(1.0, 0.0), [1.0, 0.0, 0.0, 1.0]);
}
