//! The frame loop: renders every frame of the animation and writes each one to
//! its own numbered file.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{image::Image, ppm, screen};

/// Fixed run configuration. [`Config::default`] is the reference animation.
#[derive(Clone, Debug)]
pub struct Config {
    pub size: screen::Size,
    pub frame_count: u32,
    pub frames_per_second: f32,
    pub output_dir: PathBuf,
    /// File name stem; frame `n` is written to `<prefix>-<nnn>.ppm`.
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: screen::Size::new(16 * 60, 9 * 60),
            frame_count: 240,
            frames_per_second: 60.0,
            output_dir: PathBuf::from("."),
            prefix: String::from("output"),
        }
    }
}

impl Config {
    /// Time of frame `index`, in seconds.
    pub fn frame_time(&self, index: u32) -> f32 {
        index as f32 / self.frames_per_second
    }

    pub fn file_name(&self, index: u32) -> String {
        format!("{}-{:03}.ppm", self.prefix, index)
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.output_dir.join(self.file_name(index))
    }
}

/// Renders frame `index` and writes it to `path`.
///
/// The file is created before rendering starts so an unwritable destination
/// fails without doing any work.
pub fn write_frame(config: &Config, index: u32, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    debug!("opened {}", path.display());

    let image = Image::render(config.size, config.frame_time(index));

    let mut writer = BufWriter::new(file);
    ppm::write(&mut writer, &image)
        .and_then(|()| writer.flush())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Renders all frames in order, printing a progress line after each.
///
/// Stops at the first frame that cannot be written; files from earlier frames
/// are left in place.
pub fn run(config: &Config) -> Result<()> {
    info!(
        "rendering {} frames at {}x{} into {}",
        config.frame_count,
        config.size.width,
        config.size.height,
        config.output_dir.display()
    );

    for index in 0..config.frame_count {
        let path = config.frame_path(index);
        write_frame(config, index, &path)?;
        println!(
            "Generated {} ({:3}/{:3})",
            config.file_name(index),
            index + 1,
            config.frame_count
        );
    }

    info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    /// A fresh directory under the system temp dir, removed on drop.
    struct Scratch(PathBuf);

    impl Scratch {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "warp-loop-{}-{}",
                name,
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&path);
            fs::create_dir_all(&path).unwrap();
            Scratch(path)
        }
    }

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn small_config(dir: &Path, frame_count: u32) -> Config {
        Config {
            size: screen::Size::new(8, 4),
            frame_count,
            output_dir: dir.to_path_buf(),
            ..Config::default()
        }
    }

    #[test]
    fn reference_configuration() {
        let config = Config::default();
        assert_eq!(config.size, screen::Size::new(960, 540));
        assert_eq!(config.frame_count, 240);
        assert_eq!(config.frame_time(0), 0.0);
        assert_eq!(config.frame_time(60), 1.0);
        assert_eq!(config.frame_time(239), 239.0 / 60.0);
    }

    #[test]
    fn file_names_are_zero_padded() {
        let config = Config::default();
        assert_eq!(config.file_name(0), "output-000.ppm");
        assert_eq!(config.file_name(7), "output-007.ppm");
        assert_eq!(config.file_name(239), "output-239.ppm");
        assert_eq!(config.frame_path(12), Path::new(".").join("output-012.ppm"));
    }

    #[test]
    fn frame_times_increase() {
        let config = Config::default();
        for index in 1..config.frame_count {
            assert!(config.frame_time(index) > config.frame_time(index - 1));
        }
    }

    #[test]
    fn run_writes_one_file_per_frame() {
        let scratch = Scratch::new("sequence");
        let config = small_config(&scratch.0, 12);
        run(&config).unwrap();

        let mut names: Vec<String> = fs::read_dir(&scratch.0)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();

        let expected: Vec<String> = (0..12).map(|i| format!("output-{:03}.ppm", i)).collect();
        assert_eq!(names, expected);

        for index in 0..12 {
            let bytes = fs::read(config.frame_path(index)).unwrap();
            let image = Image::render(config.size, config.frame_time(index));
            let mut expected = ppm::header(config.size).into_bytes();
            expected.extend_from_slice(image.as_bytes());
            assert_eq!(bytes, expected, "frame {}", index);
        }
    }

    #[test]
    fn frames_differ_over_time() {
        let scratch = Scratch::new("motion");
        let config = Config {
            size: screen::Size::new(32, 18),
            frames_per_second: 1.0,
            ..small_config(&scratch.0, 2)
        };
        run(&config).unwrap();

        let first = fs::read(config.frame_path(0)).unwrap();
        let second = fs::read(config.frame_path(1)).unwrap();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }

    #[test]
    fn unwritable_output_is_an_error() {
        let scratch = Scratch::new("missing");
        let config = small_config(&scratch.0.join("does-not-exist"), 3);

        let error = run(&config).unwrap_err();
        let message = format!("{:#}", error);
        assert!(message.contains("failed to create"), "{}", message);
        assert!(message.contains("output-000.ppm"), "{}", message);
        assert!(!config.frame_path(1).exists());
    }
}
