/// Grayscale checkerboard of 32/220 cells, with `pad` junk bytes after each row.
pub fn checkerboard_u8(width: usize, height: usize, cell: usize, pad: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let stride = width + pad;
    let mut img = vec![0xAAu8; stride * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            img[y * stride + x] = if sum & 1 == 0 { 32 } else { 220 };
        }
    }
    img
}

/// Value the checkerboard holds at (x, y).
pub fn checker_value(x: usize, y: usize, cell: usize) -> u8 {
    if (x / cell + y / cell) & 1 == 0 {
        32
    } else {
        220
    }
}

/// Packed RGB gradient with distinct channels.
pub fn gradient_rgb(width: usize, height: usize) -> Vec<u8> {
    let mut img = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            img.push((x * 255 / width.max(1)) as u8);
            img.push((y * 255 / height.max(1)) as u8);
            img.push(((x + y) * 7 % 256) as u8);
        }
    }
    img
}
