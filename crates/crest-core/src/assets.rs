//! Asset decoding: glTF/GLB import, Draco-compressed primitives, and a JSON
//! fallback for documents the importer rejects outright (extensionsRequired
//! with no plain buffer views).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use draco_decoder::{AttributeDataType, MeshDecodeConfig};
use gltf::mesh::util::ReadIndices;
use smallvec::SmallVec;
use thiserror::Error;

use crate::mesh::{MaterialParams, MeshPart, Model, Vertex};

pub const DRACO_EXTENSION: &str = "KHR_draco_mesh_compression";

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to import glTF: {0}")]
    Import(#[from] gltf::Error),
    #[error("glTF JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("buffer base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("draco decode: {0}")]
    Draco(String),
    #[error("malformed document: {0}")]
    Malformed(&'static str),
    #[error("no geometry found in asset")]
    EmptyGeometry,
}

/// One Draco-encoded attribute in decode order, enough to walk the decoder's
/// packed output buffer.
#[derive(Clone, Debug)]
pub struct AttrSpec {
    pub semantic: String,
    pub dims: usize,
    pub comp_size: usize,
    pub data_type: AttributeDataType,
}

/// Primitives rarely carry more than a handful of attributes.
pub type AttrSpecs = SmallVec<[AttrSpec; 8]>;

/// Kick the Draco decoder once with an empty blob so its module is
/// instantiated before the real asset arrives. The decode error is expected
/// and discarded.
pub async fn prewarm_decoder() {
    let cfg = MeshDecodeConfig::new(0, 0);
    let _ = draco_decoder::decode_mesh(&[], &cfg).await;
}

/// Decode a binary glTF (or plain glTF JSON) byte slice into a model with
/// stylized materials. The single entry point the web loader calls once.
pub async fn parse_asset(bytes: &[u8]) -> Result<Model, AssetError> {
    match gltf::import_slice(bytes) {
        Ok((doc, buffers, _images)) => model_from_document(&doc, &buffers).await,
        Err(err) => {
            // The importer refuses documents whose only geometry lives inside
            // the Draco extension; retry those through the raw-JSON path.
            log::debug!("importer rejected document ({err}); trying raw Draco JSON path");
            match model_from_draco_json(bytes).await {
                Ok(model) => Ok(model),
                Err(_) => Err(err.into()),
            }
        }
    }
}

async fn model_from_document(
    doc: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Model, AssetError> {
    let mut parts: Vec<MeshPart> = Vec::new();
    for mesh in doc.meshes() {
        for prim in mesh.primitives() {
            let material = stylized_material(&prim);
            let geometry = match prim.extension_value(DRACO_EXTENSION) {
                Some(ext) => Some(decode_compressed_primitive(doc, buffers, &prim, ext).await?),
                None => read_plain_primitive(&prim, buffers)?,
            };
            if let Some((vertices, indices)) = geometry {
                if !vertices.is_empty() {
                    parts.push(MeshPart {
                        vertices,
                        indices,
                        material,
                    });
                }
            }
        }
    }
    if parts.is_empty() {
        return Err(AssetError::EmptyGeometry);
    }
    Ok(Model::new(parts))
}

/// Visual consistency regardless of authored materials: only roughness and
/// metalness survive from the source, clamped; everything else is forced.
fn stylized_material(prim: &gltf::Primitive<'_>) -> MaterialParams {
    match prim.material().index() {
        None => MaterialParams::stylized(None, None),
        Some(_) => {
            let pbr = prim.material().pbr_metallic_roughness();
            MaterialParams::stylized(Some(pbr.roughness_factor()), Some(pbr.metallic_factor()))
        }
    }
}

fn read_plain_primitive(
    prim: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
) -> Result<Option<(Vec<Vertex>, Vec<u32>)>, AssetError> {
    let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
    let pos: Vec<[f32; 3]> = match reader.read_positions() {
        Some(it) => it.collect(),
        None => return Ok(None),
    };
    let nrm: Vec<[f32; 3]> = match reader.read_normals() {
        Some(it) => it.collect(),
        None => vec![[0.0, 1.0, 0.0]; pos.len()],
    };
    let vertices: Vec<Vertex> = pos
        .iter()
        .zip(nrm.iter())
        .map(|(p, n)| Vertex { pos: *p, nrm: *n })
        .collect();
    let indices: Vec<u32> = match reader.read_indices() {
        Some(ReadIndices::U8(it)) => it.map(u32::from).collect(),
        Some(ReadIndices::U16(it)) => it.map(u32::from).collect(),
        Some(ReadIndices::U32(it)) => it.collect(),
        None => (0..pos.len() as u32).collect(),
    };
    Ok(Some((vertices, indices)))
}

async fn decode_compressed_primitive(
    doc: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    prim: &gltf::Primitive<'_>,
    ext: &serde_json::Value,
) -> Result<(Vec<Vertex>, Vec<u32>), AssetError> {
    let view_index = ext
        .get("bufferView")
        .and_then(|v| v.as_u64())
        .ok_or(AssetError::Malformed("draco bufferView missing"))? as usize;
    let view = doc
        .views()
        .nth(view_index)
        .ok_or(AssetError::Malformed("draco bufferView out of range"))?;
    let buffer = buffers
        .get(view.buffer().index())
        .ok_or(AssetError::Malformed("draco buffer out of range"))?;
    let start = view.offset();
    let end = start + view.length();
    let data = buffer
        .0
        .get(start..end)
        .ok_or(AssetError::Malformed("draco bufferView out of bounds"))?;

    let attrs = document_attr_specs(prim, ext)?;
    let vertex_count = prim
        .get(&gltf::Semantic::Positions)
        .ok_or(AssetError::Malformed("POSITION accessor missing"))?
        .count() as u32;
    let index_count = prim.indices().map(|a| a.count() as u32).unwrap_or(0);

    decode_draco_blob(data, vertex_count, index_count, &attrs).await
}

/// Build the attribute walk order for an imported document's primitive:
/// Draco attribute id order, with dims and component types taken from the
/// glTF accessors.
fn document_attr_specs(
    prim: &gltf::Primitive<'_>,
    ext: &serde_json::Value,
) -> Result<AttrSpecs, AssetError> {
    let attr_map = ext
        .get("attributes")
        .and_then(|a| a.as_object())
        .ok_or(AssetError::Malformed("draco attributes missing"))?;
    let mut specs: SmallVec<[(u64, AttrSpec); 8]> = SmallVec::new();
    for (key, id) in attr_map {
        let id = id
            .as_u64()
            .ok_or(AssetError::Malformed("draco attribute id not a number"))?;
        let semantic = semantic_from_key(key)
            .ok_or(AssetError::Malformed("unknown draco attribute semantic"))?;
        let accessor = prim
            .get(&semantic)
            .ok_or(AssetError::Malformed("accessor missing for draco attribute"))?;
        let dims = accessor.dimensions().multiplicity();
        let comp_size = accessor.data_type().size();
        specs.push((
            id,
            AttrSpec {
                semantic: key.clone(),
                dims,
                comp_size,
                data_type: draco_type_for(accessor.data_type()),
            },
        ));
    }
    specs.sort_by_key(|(id, _)| *id);
    Ok(specs.into_iter().map(|(_, s)| s).collect())
}

fn semantic_from_key(key: &str) -> Option<gltf::Semantic> {
    use gltf::Semantic::*;
    Some(match key {
        "POSITION" => Positions,
        "NORMAL" => Normals,
        "TANGENT" => Tangents,
        _ => {
            let (prefix, set) = key.rsplit_once('_')?;
            let set: u32 = set.parse().ok()?;
            match prefix {
                "COLOR" => Colors(set),
                "TEXCOORD" => TexCoords(set),
                "JOINTS" => Joints(set),
                "WEIGHTS" => Weights(set),
                _ => return None,
            }
        }
    })
}

fn draco_type_for(ty: gltf::accessor::DataType) -> AttributeDataType {
    use gltf::accessor::DataType;
    match ty {
        DataType::F32 => AttributeDataType::Float32,
        DataType::U32 => AttributeDataType::UInt32,
        DataType::U16 => AttributeDataType::UInt16,
        DataType::I16 => AttributeDataType::Int16,
        DataType::U8 => AttributeDataType::UInt8,
        DataType::I8 => AttributeDataType::Int8,
    }
}

/// Run the Draco decoder over a compressed blob and lift POSITION/NORMAL out
/// of its packed output.
async fn decode_draco_blob(
    data: &[u8],
    vertex_count: u32,
    index_count: u32,
    attrs: &[AttrSpec],
) -> Result<(Vec<Vertex>, Vec<u32>), AssetError> {
    let mut cfg = MeshDecodeConfig::new(vertex_count, index_count);
    for attr in attrs {
        cfg.add_attribute(attr.dims as u32, attr.data_type);
    }
    let decoded = draco_decoder::decode_mesh(data, &cfg)
        .await
        .ok_or_else(|| AssetError::Draco("decode_mesh returned None".into()))?;
    walk_decoded_layout(&decoded, vertex_count, index_count, attrs)
}

/// The decoder emits indices first (u16 when they fit, u32 otherwise), then
/// each attribute tightly packed in the order it was configured.
fn walk_decoded_layout(
    decoded: &[u8],
    vertex_count: u32,
    index_count: u32,
    attrs: &[AttrSpec],
) -> Result<(Vec<Vertex>, Vec<u32>), AssetError> {
    let mut off = 0usize;
    let mut indices: Vec<u32> = Vec::with_capacity(index_count as usize);
    if index_count > 0 {
        let wide = index_count > u32::from(u16::MAX);
        let idx_bytes = index_count as usize * if wide { 4 } else { 2 };
        let slice = decoded
            .get(off..off + idx_bytes)
            .ok_or(AssetError::Malformed("decoded index range out of bounds"))?;
        off += idx_bytes;
        if wide {
            for c in slice.chunks_exact(4) {
                indices.push(u32::from_le_bytes([c[0], c[1], c[2], c[3]]));
            }
        } else {
            for c in slice.chunks_exact(2) {
                indices.push(u32::from(u16::from_le_bytes([c[0], c[1]])));
            }
        }
    }

    let mut positions: Option<Vec<[f32; 3]>> = None;
    let mut normals: Option<Vec<[f32; 3]>> = None;
    for attr in attrs {
        let byte_len = attr.dims * attr.comp_size * vertex_count as usize;
        let slice = decoded
            .get(off..off + byte_len)
            .ok_or(AssetError::Malformed("decoded attribute out of bounds"))?;
        off += byte_len;
        if attr.comp_size != 4 || !matches!(attr.data_type, AttributeDataType::Float32) {
            continue;
        }
        match attr.semantic.as_str() {
            "POSITION" => positions = Some(read_vec3s(slice, attr.dims)),
            "NORMAL" => normals = Some(read_vec3s(slice, attr.dims)),
            _ => {}
        }
    }

    let pos = positions.ok_or(AssetError::Malformed("decoded POSITION missing"))?;
    let nrm = normals.unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; pos.len()]);
    let vertices: Vec<Vertex> = pos
        .iter()
        .zip(nrm.iter())
        .map(|(p, n)| Vertex { pos: *p, nrm: *n })
        .collect();
    if index_count == 0 {
        indices = (0..vertices.len() as u32).collect();
    }
    Ok((vertices, indices))
}

fn read_vec3s(slice: &[u8], dims: usize) -> Vec<[f32; 3]> {
    let stride = dims * 4;
    let mut out = Vec::with_capacity(slice.len() / stride.max(1));
    for c in slice.chunks_exact(stride) {
        let x = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
        let y = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
        let z = if dims > 2 {
            f32::from_le_bytes([c[8], c[9], c[10], c[11]])
        } else {
            0.0
        };
        out.push([x, y, z]);
    }
    out
}

// ---------------- JSON fallback ----------------

/// Handle a `.gltf` document the importer refuses: Draco in
/// `extensionsRequired` with all geometry behind the extension and `data:`
/// URI buffers.
async fn model_from_draco_json(bytes: &[u8]) -> Result<Model, AssetError> {
    let v: serde_json::Value = serde_json::from_slice(bytes)?;
    let required = v
        .get("extensionsRequired")
        .and_then(|x| x.as_array())
        .map(|a| a.iter().any(|s| s.as_str() == Some(DRACO_EXTENSION)))
        .unwrap_or(false);
    if !required {
        return Err(AssetError::Malformed("no required draco extension"));
    }

    let mut bin: Vec<Vec<u8>> = Vec::new();
    for b in v
        .get("buffers")
        .and_then(|b| b.as_array())
        .ok_or(AssetError::Malformed("buffers missing"))?
    {
        let uri = b
            .get("uri")
            .and_then(|u| u.as_str())
            .ok_or(AssetError::Malformed("buffer.uri missing"))?;
        let b64 = uri
            .split_once(',')
            .map(|(_, tail)| tail)
            .ok_or(AssetError::Malformed("only data: URIs supported"))?;
        bin.push(BASE64.decode(b64.as_bytes())?);
    }

    let views = json_array(&v, "bufferViews")?;
    let accessors = json_array(&v, "accessors")?;
    let meshes = json_array(&v, "meshes")?;

    let mut parts: Vec<MeshPart> = Vec::new();
    for mesh in meshes {
        let Some(prims) = mesh.get("primitives").and_then(|p| p.as_array()) else {
            continue;
        };
        for prim in prims {
            let Some(ext) = prim.get("extensions").and_then(|e| e.get(DRACO_EXTENSION)) else {
                continue;
            };
            let view_index = ext
                .get("bufferView")
                .and_then(|b| b.as_u64())
                .ok_or(AssetError::Malformed("draco bufferView missing"))? as usize;
            let view = views
                .get(view_index)
                .ok_or(AssetError::Malformed("draco bufferView out of range"))?;
            let buf_index = view.get("buffer").and_then(|b| b.as_u64()).unwrap_or(0) as usize;
            let offset = view.get("byteOffset").and_then(|b| b.as_u64()).unwrap_or(0) as usize;
            let length = view
                .get("byteLength")
                .and_then(|b| b.as_u64())
                .ok_or(AssetError::Malformed("byteLength missing"))? as usize;
            let data = bin
                .get(buf_index)
                .and_then(|b| b.get(offset..offset + length))
                .ok_or(AssetError::Malformed("draco bufferView out of bounds"))?;

            let attrs_json = prim
                .get("attributes")
                .and_then(|a| a.as_object())
                .ok_or(AssetError::Malformed("primitive.attributes missing"))?;
            let pos_acc = attrs_json
                .get("POSITION")
                .and_then(|i| i.as_u64())
                .ok_or(AssetError::Malformed("POSITION accessor missing"))? as usize;
            let vertex_count = accessors
                .get(pos_acc)
                .and_then(|a| a.get("count"))
                .and_then(|c| c.as_u64())
                .ok_or(AssetError::Malformed("POSITION.count missing"))? as u32;
            let index_count = prim
                .get("indices")
                .and_then(|i| i.as_u64())
                .and_then(|i| accessors.get(i as usize))
                .and_then(|a| a.get("count"))
                .and_then(|c| c.as_u64())
                .unwrap_or(0) as u32;

            let attrs = json_attr_specs(ext, attrs_json, accessors)?;
            let (vertices, indices) =
                decode_draco_blob(data, vertex_count, index_count, &attrs).await?;
            if !vertices.is_empty() {
                parts.push(MeshPart {
                    vertices,
                    indices,
                    material: MaterialParams::stylized(None, None),
                });
            }
        }
    }
    if parts.is_empty() {
        return Err(AssetError::EmptyGeometry);
    }
    Ok(Model::new(parts))
}

fn json_array<'a>(
    v: &'a serde_json::Value,
    key: &'static str,
) -> Result<&'a Vec<serde_json::Value>, AssetError> {
    v.get(key)
        .and_then(|x| x.as_array())
        .ok_or(AssetError::Malformed("document section missing"))
}

/// Attribute walk order for a raw-JSON primitive, mirroring
/// [`document_attr_specs`] without the importer's accessor types.
pub fn json_attr_specs(
    ext: &serde_json::Value,
    attrs_json: &serde_json::Map<String, serde_json::Value>,
    accessors: &[serde_json::Value],
) -> Result<AttrSpecs, AssetError> {
    let attr_map = ext
        .get("attributes")
        .and_then(|a| a.as_object())
        .ok_or(AssetError::Malformed("draco attributes missing"))?;
    let mut specs: SmallVec<[(u64, AttrSpec); 8]> = SmallVec::new();
    for (key, id) in attr_map {
        let id = id
            .as_u64()
            .ok_or(AssetError::Malformed("draco attribute id not a number"))?;
        let acc_index = attrs_json.get(key).and_then(|i| i.as_u64()).unwrap_or(0) as usize;
        let acc = accessors
            .get(acc_index)
            .ok_or(AssetError::Malformed("accessor missing for draco attribute"))?;
        let dims = match acc.get("type").and_then(|t| t.as_str()).unwrap_or("VEC3") {
            "SCALAR" => 1,
            "VEC2" => 2,
            "VEC4" => 4,
            _ => 3,
        };
        let ctype = acc
            .get("componentType")
            .and_then(|c| c.as_u64())
            .unwrap_or(5126);
        let (data_type, comp_size) = match ctype {
            5120 => (AttributeDataType::Int8, 1),
            5121 => (AttributeDataType::UInt8, 1),
            5122 => (AttributeDataType::Int16, 2),
            5123 => (AttributeDataType::UInt16, 2),
            5125 => (AttributeDataType::UInt32, 4),
            _ => (AttributeDataType::Float32, 4),
        };
        specs.push((
            id,
            AttrSpec {
                semantic: key.clone(),
                dims,
                comp_size,
                data_type,
            },
        ));
    }
    specs.sort_by_key(|(id, _)| *id);
    Ok(specs.into_iter().map(|(_, s)| s).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_keys_round_trip() {
        assert_eq!(semantic_from_key("POSITION"), Some(gltf::Semantic::Positions));
        assert_eq!(semantic_from_key("NORMAL"), Some(gltf::Semantic::Normals));
        assert_eq!(
            semantic_from_key("TEXCOORD_1"),
            Some(gltf::Semantic::TexCoords(1))
        );
        assert_eq!(semantic_from_key("_CUSTOM"), None);
    }

    #[test]
    fn walk_layout_extracts_position_and_normal() {
        // Two vertices, two u16 indices, POSITION then NORMAL.
        let attrs = vec![
            AttrSpec {
                semantic: "POSITION".into(),
                dims: 3,
                comp_size: 4,
                data_type: AttributeDataType::Float32,
            },
            AttrSpec {
                semantic: "NORMAL".into(),
                dims: 3,
                comp_size: 4,
                data_type: AttributeDataType::Float32,
            },
        ];
        let mut bytes: Vec<u8> = Vec::new();
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        for v in [[0.0f32, 1.0, 2.0], [3.0, 4.0, 5.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        for v in [[0.0f32, 1.0, 0.0], [1.0, 0.0, 0.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        let (vertices, indices) = walk_decoded_layout(&bytes, 2, 2, &attrs).expect("walk layout");
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].pos, [3.0, 4.0, 5.0]);
        assert_eq!(vertices[1].nrm, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn json_attr_specs_follow_draco_id_order() {
        // JSON maps iterate alphabetically (NORMAL, POSITION, TEXCOORD_0),
        // which differs from the Draco id order the decoder needs.
        let ext = serde_json::json!({
            "bufferView": 0,
            "attributes": { "NORMAL": 2, "POSITION": 0, "TEXCOORD_0": 1 }
        });
        let attrs_json = serde_json::json!({ "NORMAL": 1, "POSITION": 0, "TEXCOORD_0": 2 });
        let accessors = vec![
            serde_json::json!({ "componentType": 5126, "count": 8, "type": "VEC3" }),
            serde_json::json!({ "componentType": 5126, "count": 8, "type": "VEC3" }),
            serde_json::json!({ "componentType": 5123, "count": 8, "type": "VEC2" }),
        ];
        let specs =
            json_attr_specs(&ext, attrs_json.as_object().unwrap(), &accessors).expect("specs");

        let order: Vec<&str> = specs.iter().map(|s| s.semantic.as_str()).collect();
        assert_eq!(order, ["POSITION", "TEXCOORD_0", "NORMAL"]);
        // Dims and component sizes come from the referenced accessors.
        assert_eq!(specs[0].dims, 3);
        assert_eq!(specs[0].comp_size, 4);
        assert!(matches!(specs[0].data_type, AttributeDataType::Float32));
        assert_eq!(specs[1].dims, 2);
        assert_eq!(specs[1].comp_size, 2);
        assert!(matches!(specs[1].data_type, AttributeDataType::UInt16));
        assert_eq!(specs[2].dims, 3);
    }

    #[test]
    fn document_attr_specs_follow_draco_id_order() {
        let doc_json = serde_json::json!({
            "asset": { "version": "2.0" },
            "extensionsUsed": ["KHR_draco_mesh_compression"],
            "extensionsRequired": ["KHR_draco_mesh_compression"],
            "buffers": [{ "byteLength": 16 }],
            "bufferViews": [{ "buffer": 0, "byteLength": 16 }],
            "accessors": [
                { "componentType": 5126, "count": 4, "type": "VEC3" },
                { "componentType": 5126, "count": 4, "type": "VEC3" },
                { "componentType": 5126, "count": 4, "type": "VEC2" }
            ],
            "meshes": [{ "primitives": [{
                "attributes": { "NORMAL": 1, "POSITION": 0, "TEXCOORD_0": 2 },
                "extensions": { "KHR_draco_mesh_compression": {
                    "bufferView": 0,
                    "attributes": { "NORMAL": 2, "POSITION": 0, "TEXCOORD_0": 1 }
                } }
            }] }]
        });
        let bytes = serde_json::to_vec(&doc_json).unwrap();
        let gltf = gltf::Gltf::from_slice(&bytes).expect("document parses");
        let mesh = gltf.document.meshes().next().expect("one mesh");
        let prim = mesh.primitives().next().expect("one primitive");
        let ext = prim
            .extension_value(DRACO_EXTENSION)
            .expect("draco extension present");

        let specs = document_attr_specs(&prim, ext).expect("specs");
        let order: Vec<&str> = specs.iter().map(|s| s.semantic.as_str()).collect();
        assert_eq!(order, ["POSITION", "TEXCOORD_0", "NORMAL"]);
        assert_eq!(specs[1].dims, 2, "TEXCOORD_0 is a VEC2 accessor");
        assert!(specs.iter().all(|s| s.comp_size == 4));
    }

    #[test]
    fn walk_layout_rejects_short_buffers() {
        let attrs = vec![AttrSpec {
            semantic: "POSITION".into(),
            dims: 3,
            comp_size: 4,
            data_type: AttributeDataType::Float32,
        }];
        let bytes = vec![0u8; 4];
        assert!(walk_decoded_layout(&bytes, 2, 0, &attrs).is_err());
    }
}
