use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TOOL_PROJECT: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFramework>net6.0</TargetFramework>
    <PackAsTool>true</PackAsTool>
    <ToolCommandName>sample-nuke-tool</ToolCommandName>
    <PackageId>SampleNukeTool</PackageId>
    <Version>1.0.7</Version>
  </PropertyGroup>

  <ItemGroup>
    <ProjectReference Include="..\InternalLibrary\InternalLibrary.csproj" />
  </ItemGroup>

</Project>
"#;

/// Helper to create the sample solution layout
#[allow(unused)]
pub fn create_sample_root() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::write(root.join("SampleNukeIssue.sln"), "").unwrap();

    fs::create_dir(root.join("InternalLibrary")).unwrap();
    fs::write(
        root.join("InternalLibrary/InternalLibrary.csproj"),
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>netstandard2.0</TargetFramework>
    <Version>1.0.0</Version>
  </PropertyGroup>
</Project>
"#,
    )
    .unwrap();

    fs::create_dir(root.join("GlobalTool")).unwrap();
    fs::write(root.join("GlobalTool/_build.csproj"), TOOL_PROJECT).unwrap();

    fs::create_dir(root.join("Demonstration")).unwrap();

    temp
}

#[allow(unused)]
pub fn tool_project(root: &Path) -> PathBuf {
    root.join("GlobalTool/_build.csproj")
}

#[allow(unused)]
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
