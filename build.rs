use std::env;
use std::path::Path;

/// Libraries the sampler links through ffmpeg-sys-next.
const REQUIRED_LIBRARIES: [&str; 4] = ["avformat", "avcodec", "avutil", "swscale"];

fn main() {
    for variable in ["FFMPEG_DIR", "PKG_CONFIG_PATH", "VCPKG_ROOT"] {
        println!("cargo:rerun-if-env-changed={variable}");
    }

    let Some(ffmpeg_dir) = env::var_os("FFMPEG_DIR") else {
        if env::var("CARGO_CFG_TARGET_OS").is_ok_and(|os| os == "windows") {
            println!(
                "cargo:warning=FFMPEG_DIR is not set. Point it at an FFmpeg install providing {} for reliable Windows builds.",
                REQUIRED_LIBRARIES.join(", "),
            );
        }
        return;
    };

    let lib_dir = Path::new(&ffmpeg_dir).join("lib");
    if !lib_dir.is_dir() {
        println!(
            "cargo:warning=FFMPEG_DIR is set but {} does not exist.",
            lib_dir.display(),
        );
        return;
    }

    let missing: Vec<&str> = REQUIRED_LIBRARIES
        .into_iter()
        .filter(|name| !has_library(&lib_dir, name))
        .collect();
    if !missing.is_empty() {
        println!(
            "cargo:warning=No {} library found under {}.",
            missing.join(", "),
            lib_dir.display(),
        );
    }
}

fn has_library(lib_dir: &Path, name: &str) -> bool {
    let Ok(entries) = lib_dir.read_dir() else {
        return false;
    };
    entries.flatten().any(|entry| {
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        [format!("lib{name}"), format!("{name}."), format!("{name}-")]
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
    })
}
