#![allow(dead_code)]

use file_squeeze::StorageDirs;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_storage() -> (TempDir, StorageDirs) {
    let temp_dir = TempDir::new().unwrap();
    let dirs = StorageDirs::under(temp_dir.path());
    dirs.ensure().unwrap();
    (temp_dir, dirs)
}

/// Noisy pixels so encoded size really depends on quality.
pub fn noisy_image(width: u32, height: u32) -> DynamicImage {
    let mut seed: u32 = 0x9e37_79b9;
    let img = RgbImage::from_fn(width, height, |x, y| {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        Rgb([
            (seed & 0xff) as u8,
            ((x * 3 + y) % 256) as u8,
            ((seed >> 8) & 0xff) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    noisy_image(width, height).write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

/// Noisy JPEG at an explicit encoder quality, for uploads well above 1 MB.
pub fn encoded_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    noisy_image(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .unwrap();
    buf.into_inner()
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// Names of all files directly inside `dir`.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// (entry name, contents) for every entry of a zip held in memory.
pub fn zip_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            entry.read_to_end(&mut data).unwrap();
            (entry.name().to_string(), data)
        })
        .collect()
}
