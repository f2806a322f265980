//! The binary container codec.
//!
//! Layout (all integers little-endian, strings are u32 length + UTF-8):
//!
//! ```text
//! magic "SKF1" | version u16
//! bones      u32, each: id, name, parent (u8 flag + u32), pos f32x2,
//!                       rot f32, scale f32x2, zindex i32,
//!                       tex_slot (u8 flag + u32),
//!                       vertices u32 { pos f32x2, uv f32x2,
//!                                      weights u32 { bone u32, weight f32 } },
//!                       indices u32 { u32 }
//! animations u32, each: name, fps u32,
//!                       keyframes u32 { frame u32, bone u32, element u8,
//!                                       value f32 }
//! families   u32, each: name, bones u32 { u32 }, target u32, constraint u8
//! styles     u32, each: name, textures u32 { atlas u32, offset f32x2,
//!                                            size f32x2 }
//! atlases    u32, each: byte length u32 + PNG data
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use image::RgbaImage;
use skelly_core::types::{
    Animation, Armature, AtlasTexture, BendDirection, Bone, BoneId, Element, IkFamily, Keyframe,
    MeshVertex, Style, Vec2, VertexWeight,
};

use crate::error::SkfError;

const MAGIC: [u8; 4] = *b"SKF1";
const VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read and validate an armature plus its atlas pages from a file.
pub fn load(path: impl AsRef<Path>) -> Result<(Armature, Vec<RgbaImage>), SkfError> {
    let file = File::open(path.as_ref())?;
    let result = read(BufReader::new(file))?;
    log::debug!(
        "loaded {}: {} bones, {} animations, {} atlas pages",
        path.as_ref().display(),
        result.0.bones.len(),
        result.0.animations.len(),
        result.1.len()
    );
    Ok(result)
}

/// Write an armature and its atlas pages to a file.
pub fn save(
    path: impl AsRef<Path>,
    armature: &Armature,
    atlases: &[RgbaImage],
) -> Result<(), SkfError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, armature, atlases)?;
    writer.flush()?;
    Ok(())
}

/// Decode a `.skf` container from any reader. The armature is validated
/// before it is returned.
pub fn read(mut r: impl Read) -> Result<(Armature, Vec<RgbaImage>), SkfError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(SkfError::BadMagic(magic));
    }
    let version = r.read_u16::<LittleEndian>()?;
    if version != VERSION {
        return Err(SkfError::UnsupportedVersion(version));
    }

    let bones = read_vec(&mut r, read_bone)?;
    let animations = read_vec(&mut r, read_animation)?;
    let ik_families = read_vec(&mut r, read_family)?;
    let styles = read_vec(&mut r, read_style)?;

    let armature = Armature {
        bones,
        animations,
        ik_families,
        styles,
    };
    armature.validate()?;

    let page_count = r.read_u32::<LittleEndian>()? as usize;
    let mut atlases = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let len = r.read_u32::<LittleEndian>()? as usize;
        let mut png = vec![0u8; len];
        r.read_exact(&mut png)?;
        let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .map_err(|source| SkfError::Image { page, source })?;
        atlases.push(decoded.to_rgba8());
    }

    Ok((armature, atlases))
}

/// Encode a `.skf` container to any writer.
pub fn write(
    mut w: impl Write,
    armature: &Armature,
    atlases: &[RgbaImage],
) -> Result<(), SkfError> {
    w.write_all(&MAGIC)?;
    w.write_u16::<LittleEndian>(VERSION)?;

    write_vec(&mut w, &armature.bones, write_bone)?;
    write_vec(&mut w, &armature.animations, write_animation)?;
    write_vec(&mut w, &armature.ik_families, write_family)?;
    write_vec(&mut w, &armature.styles, write_style)?;

    w.write_u32::<LittleEndian>(atlases.len() as u32)?;
    for (page, atlas) in atlases.iter().enumerate() {
        let mut png = Cursor::new(Vec::new());
        atlas
            .write_to(&mut png, image::ImageFormat::Png)
            .map_err(|source| SkfError::Image { page, source })?;
        let png = png.into_inner();
        w.write_u32::<LittleEndian>(png.len() as u32)?;
        w.write_all(&png)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Section codecs
// ---------------------------------------------------------------------------

fn read_vec<R: Read, T>(
    r: &mut R,
    item: impl Fn(&mut R) -> Result<T, SkfError>,
) -> Result<Vec<T>, SkfError> {
    let count = r.read_u32::<LittleEndian>()? as usize;
    let mut out = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        out.push(item(r)?);
    }
    Ok(out)
}

fn write_vec<W: Write, T>(
    w: &mut W,
    items: &[T],
    item: impl Fn(&mut W, &T) -> Result<(), SkfError>,
) -> Result<(), SkfError> {
    w.write_u32::<LittleEndian>(items.len() as u32)?;
    for it in items {
        item(w, it)?;
    }
    Ok(())
}

fn read_string(r: &mut impl Read) -> Result<String, SkfError> {
    let len = r.read_u32::<LittleEndian>()? as usize;
    let mut bytes = vec![0u8; len];
    r.read_exact(&mut bytes)?;
    Ok(String::from_utf8(bytes)?)
}

fn write_string(w: &mut impl Write, s: &str) -> Result<(), SkfError> {
    w.write_u32::<LittleEndian>(s.len() as u32)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn read_vec2(r: &mut impl Read) -> Result<Vec2, SkfError> {
    let x = r.read_f32::<LittleEndian>()?;
    let y = r.read_f32::<LittleEndian>()?;
    Ok(Vec2::new(x, y))
}

fn write_vec2(w: &mut impl Write, v: &Vec2) -> Result<(), SkfError> {
    w.write_f32::<LittleEndian>(v.x)?;
    w.write_f32::<LittleEndian>(v.y)?;
    Ok(())
}

fn read_opt_u32(r: &mut impl Read) -> Result<Option<u32>, SkfError> {
    match r.read_u8()? {
        0 => Ok(None),
        _ => Ok(Some(r.read_u32::<LittleEndian>()?)),
    }
}

fn write_opt_u32(w: &mut impl Write, v: Option<u32>) -> Result<(), SkfError> {
    match v {
        None => w.write_u8(0)?,
        Some(value) => {
            w.write_u8(1)?;
            w.write_u32::<LittleEndian>(value)?;
        }
    }
    Ok(())
}

fn read_bone(r: &mut impl Read) -> Result<Bone, SkfError> {
    let id = BoneId(r.read_u32::<LittleEndian>()?);
    let name = read_string(r)?;
    let parent = read_opt_u32(r)?.map(BoneId);
    let pos = read_vec2(r)?;
    let rot = r.read_f32::<LittleEndian>()?;
    let scale = read_vec2(r)?;
    let zindex = r.read_i32::<LittleEndian>()?;
    let tex_slot = read_opt_u32(r)?.map(|v| v as usize);
    let vertices = read_vec(r, read_mesh_vertex)?;
    let indices = read_vec(r, |r| Ok(r.read_u32::<LittleEndian>()?))?;
    Ok(Bone {
        id,
        name,
        parent,
        pos,
        rot,
        scale,
        zindex,
        tex_slot,
        vertices,
        indices,
    })
}

fn write_bone(w: &mut impl Write, bone: &Bone) -> Result<(), SkfError> {
    w.write_u32::<LittleEndian>(bone.id.0)?;
    write_string(w, &bone.name)?;
    write_opt_u32(w, bone.parent.map(|p| p.0))?;
    write_vec2(w, &bone.pos)?;
    w.write_f32::<LittleEndian>(bone.rot)?;
    write_vec2(w, &bone.scale)?;
    w.write_i32::<LittleEndian>(bone.zindex)?;
    write_opt_u32(w, bone.tex_slot.map(|s| s as u32))?;
    write_vec(w, &bone.vertices, write_mesh_vertex)?;
    write_vec(w, &bone.indices, |w, &i| {
        Ok(w.write_u32::<LittleEndian>(i)?)
    })?;
    Ok(())
}

fn read_mesh_vertex(r: &mut impl Read) -> Result<MeshVertex, SkfError> {
    let pos = read_vec2(r)?;
    let uv = read_vec2(r)?;
    let weights = read_vec(r, |r| {
        let bone = BoneId(r.read_u32::<LittleEndian>()?);
        let weight = r.read_f32::<LittleEndian>()?;
        Ok(VertexWeight { bone, weight })
    })?;
    Ok(MeshVertex { pos, uv, weights })
}

fn write_mesh_vertex(w: &mut impl Write, v: &MeshVertex) -> Result<(), SkfError> {
    write_vec2(w, &v.pos)?;
    write_vec2(w, &v.uv)?;
    write_vec(w, &v.weights, |w, vw| {
        w.write_u32::<LittleEndian>(vw.bone.0)?;
        w.write_f32::<LittleEndian>(vw.weight)?;
        Ok(())
    })
}

fn read_animation(r: &mut impl Read) -> Result<Animation, SkfError> {
    let name = read_string(r)?;
    let fps = r.read_u32::<LittleEndian>()?;
    let keyframes = read_vec(r, |r| {
        let frame = r.read_u32::<LittleEndian>()?;
        let bone = BoneId(r.read_u32::<LittleEndian>()?);
        let element = decode_element(r.read_u8()?)?;
        let value = r.read_f32::<LittleEndian>()?;
        Ok(Keyframe {
            frame,
            bone,
            element,
            value,
        })
    })?;
    Ok(Animation {
        name,
        fps,
        keyframes,
    })
}

fn write_animation(w: &mut impl Write, anim: &Animation) -> Result<(), SkfError> {
    write_string(w, &anim.name)?;
    w.write_u32::<LittleEndian>(anim.fps)?;
    write_vec(w, &anim.keyframes, |w, kf| {
        w.write_u32::<LittleEndian>(kf.frame)?;
        w.write_u32::<LittleEndian>(kf.bone.0)?;
        w.write_u8(encode_element(kf.element))?;
        w.write_f32::<LittleEndian>(kf.value)?;
        Ok(())
    })
}

fn read_family(r: &mut impl Read) -> Result<IkFamily, SkfError> {
    let name = read_string(r)?;
    let bones = read_vec(r, |r| Ok(BoneId(r.read_u32::<LittleEndian>()?)))?;
    let target = BoneId(r.read_u32::<LittleEndian>()?);
    let constraint = match r.read_u8()? {
        0 => BendDirection::Clockwise,
        1 => BendDirection::CounterClockwise,
        tag => return Err(SkfError::BadConstraint(tag)),
    };
    Ok(IkFamily {
        name,
        bones,
        target,
        constraint,
    })
}

fn write_family(w: &mut impl Write, family: &IkFamily) -> Result<(), SkfError> {
    write_string(w, &family.name)?;
    write_vec(w, &family.bones, |w, b| {
        Ok(w.write_u32::<LittleEndian>(b.0)?)
    })?;
    w.write_u32::<LittleEndian>(family.target.0)?;
    w.write_u8(match family.constraint {
        BendDirection::Clockwise => 0,
        BendDirection::CounterClockwise => 1,
    })?;
    Ok(())
}

fn read_style(r: &mut impl Read) -> Result<Style, SkfError> {
    let name = read_string(r)?;
    let textures = read_vec(r, |r| {
        let atlas = r.read_u32::<LittleEndian>()? as usize;
        let offset = read_vec2(r)?;
        let size = read_vec2(r)?;
        Ok(AtlasTexture {
            atlas,
            offset,
            size,
        })
    })?;
    Ok(Style { name, textures })
}

fn write_style(w: &mut impl Write, style: &Style) -> Result<(), SkfError> {
    write_string(w, &style.name)?;
    write_vec(w, &style.textures, |w, tex| {
        w.write_u32::<LittleEndian>(tex.atlas as u32)?;
        write_vec2(w, &tex.offset)?;
        write_vec2(w, &tex.size)?;
        Ok(())
    })
}

fn encode_element(element: Element) -> u8 {
    match element {
        Element::PositionX => 0,
        Element::PositionY => 1,
        Element::Rotation => 2,
        Element::ScaleX => 3,
        Element::ScaleY => 4,
    }
}

fn decode_element(tag: u8) -> Result<Element, SkfError> {
    match tag {
        0 => Ok(Element::PositionX),
        1 => Ok(Element::PositionY),
        2 => Ok(Element::Rotation),
        3 => Ok(Element::ScaleX),
        4 => Ok(Element::ScaleY),
        _ => Err(SkfError::BadElement(tag)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
