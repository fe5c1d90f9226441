use futures::future::try_join_all;
use glam::Vec3;
use showreel_common::{Color, EntityId, MaterialState, Transform};
use showreel_scene::{EntityKind, SceneEntity, SceneGraph};
use std::future::Future;

use crate::AssetError;
use crate::loader::{AssetLoader, ModelNode};
use crate::manifest::AssetManifest;

/// Resolve every name concurrently; the result is in input order.
///
/// One failed load fails the whole batch with `ResourceLoadFailure`.
pub async fn resolve_all<L, S>(loader: &L, names: &[S]) -> Result<Vec<ModelNode>, AssetError>
where
    L: AssetLoader,
    S: AsRef<str>,
{
    let loads = names.iter().map(|name| {
        let name = name.as_ref();
        async move {
            loader.load(name).await.map_err(|e| match e {
                failure @ AssetError::ResourceLoadFailure { .. } => failure,
                other => AssetError::ResourceLoadFailure {
                    name: name.to_string(),
                    reason: other.to_string(),
                },
            })
        }
    });
    let nodes = try_join_all(loads).await?;
    tracing::info!(count = nodes.len(), "resources resolved");
    Ok(nodes)
}

/// Run an asset future to completion on a current-thread runtime.
///
/// File reads are handed to the runtime's blocking pool, so loads joined by
/// [`resolve_all`] overlap instead of running one after another.
pub fn block_on<F: Future>(future: F) -> Result<F::Output, AssetError> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    Ok(runtime.block_on(future))
}

/// Drive [`resolve_all`] to completion on the current thread.
pub fn resolve_blocking<L: AssetLoader>(
    loader: &L,
    manifest: &AssetManifest,
) -> Result<Vec<ModelNode>, AssetError> {
    if manifest.models.is_empty() {
        return Err(AssetError::EmptyManifest);
    }
    let _span = tracing::info_span!("resolve_assets", models = manifest.models.len()).entered();
    block_on(resolve_all(loader, &manifest.names()))?
}

/// Handles of the entities [`populate`] inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Model entities in manifest order.
    pub models: Vec<EntityId>,
    pub decoration: EntityId,
    /// The model marked `spin` in the manifest, if any (first one wins).
    pub spinning: Option<EntityId>,
}

/// Insert resolved models and the decoration into the scene.
///
/// Order: the first model (opaque, casting shadows), the decoration, then
/// the remaining models, transparent at opacity 0.
pub fn populate(
    scene: &mut SceneGraph,
    manifest: &AssetManifest,
    nodes: &[ModelNode],
) -> Result<Placement, AssetError> {
    if nodes.len() != manifest.models.len() {
        return Err(AssetError::CountMismatch {
            expected: manifest.models.len(),
            resolved: nodes.len(),
        });
    }
    if nodes.is_empty() {
        return Err(AssetError::EmptyManifest);
    }

    let model = |index: usize| {
        let setup = &manifest.models[index];
        let entity = SceneEntity::new(
            setup.name.clone(),
            EntityKind::Model {
                resource: nodes[index].name.clone(),
            },
        )
        .with_transform(setup.transform);
        if index == 0 {
            entity
                .with_material(MaterialState::transparent(1.0))
                .casting_shadow()
        } else {
            entity.with_material(MaterialState::transparent(0.0))
        }
    };

    let mut models = Vec::with_capacity(nodes.len());
    models.push(scene.add(model(0)));

    let deco = &manifest.decoration;
    let decoration = scene.add(
        SceneEntity::new(
            deco.name.clone(),
            EntityKind::Decoration {
                texture: deco.texture.clone(),
                width: deco.width,
                height: deco.height,
            },
        )
        .with_transform(deco.transform)
        .with_material(MaterialState::transparent(deco.opacity)),
    );

    for index in 1..nodes.len() {
        models.push(scene.add(model(index)));
    }

    let spinning = manifest
        .models
        .iter()
        .position(|m| m.spin)
        .map(|index| models[index]);

    tracing::debug!(models = models.len(), "models placed");
    Ok(Placement {
        models,
        decoration,
        spinning,
    })
}

/// Add the ground plane, lights and grid after the models.
pub fn add_environment(scene: &mut SceneGraph) {
    scene.add(
        SceneEntity::new("ground", EntityKind::Ground { size: 2000.0 })
            .with_transform(Transform::default().with_rotation(Vec3::new(
                -std::f32::consts::FRAC_PI_2,
                0.0,
                0.0,
            )))
            .with_material(MaterialState::opaque())
            .receiving_shadow(),
    );
    scene.add(
        SceneEntity::new(
            "hemisphere light",
            EntityKind::HemisphereLight {
                sky: Color::WHITE,
                ground: Color(0x444444),
            },
        )
        .with_transform(Transform::from_position(Vec3::new(0.0, 200.0, 0.0))),
    );
    scene.add(
        SceneEntity::new(
            "directional light",
            EntityKind::DirectionalLight {
                color: Color::WHITE,
            },
        )
        .with_transform(Transform::from_position(Vec3::new(0.0, 200.0, 100.0)))
        .casting_shadow(),
    );
    scene.add(
        SceneEntity::new(
            "grid",
            EntityKind::Grid {
                size: 2000.0,
                divisions: 20,
            },
        )
        .with_material(MaterialState::transparent(0.2)),
    );
}
