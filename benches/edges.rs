use clear_volume::utils::edges::{canny, gaussian_blur};
use clear_volume::utils::hough::hough_lines;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};

fn stepped_image(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let inside = x > width / 4 && x < 3 * width / 4 && y > height / 5;
        match (inside, y > height / 2) {
            (false, _) => Luma([15]),
            (true, false) => Luma([235]),
            (true, true) => Luma([110]),
        }
    })
}

fn bench_gaussian_blur(c: &mut Criterion) {
    let image = stepped_image(640, 480);
    c.bench_function("gaussian_blur_640x480", |b| {
        b.iter(|| gaussian_blur(black_box(&image), black_box(1.1)))
    });
}

fn bench_canny(c: &mut Criterion) {
    let image = stepped_image(640, 480);
    c.bench_function("canny_640x480", |b| {
        b.iter(|| canny(black_box(&image), black_box(50.0), black_box(150.0)))
    });
}

fn bench_hough(c: &mut Criterion) {
    let edges = canny(&stepped_image(320, 640), 50.0, 150.0);
    c.bench_function("hough_lines_320x640", |b| {
        b.iter(|| hough_lines(black_box(&edges), 50, 1))
    });
}

criterion_group!(benches, bench_gaussian_blur, bench_canny, bench_hough);
criterion_main!(benches);
