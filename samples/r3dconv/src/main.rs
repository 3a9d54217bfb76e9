use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use r3d::{AssetFlags, MeshData, MeshError, Options};

mod cli;

use cli::{Cli, Command};

#[derive(Debug, thiserror::Error)]
pub enum ConvError {
    #[error("{path:?}: {source}")]
    Read { path: Box<Path>, source: r3d::Error },
    #[error("{path:?}: {source}")]
    Write {
        path: Box<Path>,
        source: std::io::Error,
    },
    #[error("{path:?}: {source}")]
    Invalid { path: Box<Path>, source: MeshError },
    #[error("{0} of {1} files failed to decode")]
    Check(usize, usize),
}

fn read(path: &Path, options: Options) -> Result<MeshData, ConvError> {
    let mesh = r3d::de::from_path(path, options).map_err(|source| ConvError::Read {
        path: path.into(),
        source,
    })?;
    mesh.validate().map_err(|source| ConvError::Invalid {
        path: path.into(),
        source,
    })?;
    Ok(mesh)
}

fn inspect(path: &Path, options: Options) -> Result<(), ConvError> {
    let mesh = read(path, options)?;
    let corners_with_normals = mesh.corner_normals().iter().flatten().count();
    let corners_with_uvs = mesh.corner_uvs().iter().flatten().count();

    println!("file:           {}", path.display());
    println!("variant:        {}", options.variant);
    println!("car:            {}", mesh.flags.is_car);
    println!("group texture:  {}", mesh.flags.is_group_texture);
    println!("vertices:       {}", mesh.positions.len());
    println!("normals:        {}", mesh.normals.len());
    println!("uvs:            {}", mesh.uvs.len());
    println!("triangles:      {}", mesh.faces.len());
    println!(
        "attributed:     {corners_with_normals} normals / {corners_with_uvs} uvs of {} corners",
        mesh.corner_count()
    );
    if let Some(first) = mesh.positions.first() {
        let (min, max) = mesh
            .positions
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.inf(p), hi.sup(p)));
        println!(
            "bounds:         ({}, {}, {}) -> ({}, {}, {})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }
    Ok(())
}

fn check(files: &[PathBuf], options: Options) -> Result<(), ConvError> {
    let mut failed = 0;
    for path in files {
        match read(path, options) {
            Ok(mesh) => tracing::info!(
                path = ?path,
                triangles = mesh.faces.len(),
                "ok"
            ),
            Err(e) => {
                tracing::error!("{e}");
                failed += 1;
            }
        }
    }
    match failed {
        0 => Ok(()),
        _ => Err(ConvError::Check(failed, files.len())),
    }
}

fn convert(
    input: &Path,
    output: &Path,
    options: Options,
    output_options: Options,
    flags: Option<AssetFlags>,
) -> Result<(), ConvError> {
    let mut mesh = read(input, options)?;
    if let Some(flags) = flags {
        tracing::debug!(from = ?mesh.flags, to = ?flags, "overriding asset flags");
        mesh.flags = flags;
    }
    r3d::ser::to_path(output, &mesh, output_options).map_err(|source| ConvError::Write {
        path: output.into(),
        source,
    })?;
    tracing::info!(
        input = ?input,
        output = ?output,
        from = %options.variant,
        to = %output_options.variant,
        triangles = mesh.faces.len(),
        "converted"
    );
    Ok(())
}

fn run(cli: Cli) -> Result<(), ConvError> {
    let options = cli.options();
    match cli.command {
        Command::Inspect { file } => inspect(&file, options),
        Command::Check { files } => check(&files, options),
        Command::Convert {
            input,
            output,
            to_variant,
            car,
            group_texture,
            plain,
        } => {
            let output_options = Options::new(to_variant.unwrap_or(options.variant));
            let flags = (car || group_texture || plain).then_some(AssetFlags {
                is_car: car,
                is_group_texture: group_texture,
            });
            convert(&input, &output, options, output_options, flags)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
