//! Generation planning: which templates render to which paths.
//!
//! Pure. The planner never touches the filesystem; existence checks and
//! merge routing happen in the orchestrator.

use serde_json::{Value, json};
use std::path::PathBuf;

use crate::application::ports::Bindings;
use crate::domain::{
    AdapterSpec, AdapterType, ArchitectureMetadata, ArtifactKind, ArtifactMetadata, ArtifactSpec,
    Dependency, DomainError, EntitySpec, GenerationRequest, InputAdapterSpec, MethodSpec,
    PathResolver, Placeholders, ProjectConfig, UseCaseSpec, parsing,
};

pub const JAVA_ROOT: &str = "src/main/java";
pub const APPLICATION_PROPERTIES: &str = "src/main/resources/application.yml";
pub const ROOT_DESCRIPTOR: &str = "build.gradle.kts";
pub const SETTINGS_FILE: &str = "settings.gradle.kts";
pub const DRIVEN_MODULES_DIR: &str = "infrastructure/driven-adapters";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedFileKind {
    Source,
    /// Per-adapter-type support class; every adapter of the type shares it.
    Shared,
    ModuleDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFile {
    /// Relative to the project root.
    pub path: PathBuf,
    pub template_id: String,
    pub bindings: Bindings,
    pub kind: PlannedFileKind,
    /// A missing template skips the file with a warning instead of failing.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertiesMerge {
    pub path: PathBuf,
    pub template_id: String,
    pub bindings: Bindings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorUpdate {
    pub path: PathBuf,
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub kind: ArtifactKind,
    pub package: String,
    pub files: Vec<PlannedFile>,
    pub properties: Option<PropertiesMerge>,
    pub descriptor: Option<DescriptorUpdate>,
    /// Module paths to include from `settings.gradle.kts`.
    pub settings_includes: Vec<String>,
    /// Role-resolved directories that must sit in a declared layer.
    pub layer_checks: Vec<PathBuf>,
}

impl GenerationPlan {
    fn new(kind: ArtifactKind, package: String) -> Self {
        Self {
            kind,
            package,
            files: Vec::new(),
            properties: None,
            descriptor: None,
            settings_includes: Vec::new(),
            layer_checks: Vec::new(),
        }
    }

    /// Every template the run needs, in plan order.
    pub fn templates(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| !f.optional)
            .map(|f| f.template_id.as_str())
            .chain(self.properties.as_ref().map(|p| p.template_id.as_str()))
            .collect()
    }

    pub fn optional_templates(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.optional)
            .map(|f| f.template_id.as_str())
            .collect()
    }

    /// Every path the run may create or modify.
    pub fn touched_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.iter().map(|f| f.path.clone()).collect();
        if let Some(properties) = &self.properties {
            paths.push(properties.path.clone());
        }
        if let Some(descriptor) = &self.descriptor {
            paths.push(descriptor.path.clone());
        }
        if !self.settings_includes.is_empty() {
            paths.push(PathBuf::from(SETTINGS_FILE));
        }
        paths.dedup();
        paths
    }
}

/// Default package for a request whose package was not given.
pub fn resolve_package(spec: &ArtifactSpec, base_package: &str) -> String {
    let suffix = match spec {
        ArtifactSpec::Entity(_) => "domain.model".to_string(),
        ArtifactSpec::UseCase(_) => "domain.port.in".to_string(),
        ArtifactSpec::Adapter(a) => {
            format!("infrastructure.drivenadapters.{}", package_segment(a.adapter_type.as_str()))
        }
        ArtifactSpec::InputAdapter(a) => {
            format!("infrastructure.entrypoints.{}", package_segment(a.adapter_type.as_str()))
        }
    };
    parsing::resolve_package(spec.package(), base_package, &suffix)
}

/// `domain.port.in` becomes `application.usecase`.
pub fn use_case_impl_package(port_package: &str) -> String {
    port_package.replace("domain.port.in", "application.usecase")
}

/// `infrastructure/driven-adapters/<kebab name>`
pub fn adapter_module_path(adapter_name: &str) -> String {
    format!("{DRIVEN_MODULES_DIR}/{}", parsing::to_kebab_case(adapter_name))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationPlanner {
    resolver: PathResolver,
}

impl GenerationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// `artifact` is required for adapters and ignored otherwise.
    pub fn plan(
        &self,
        request: &GenerationRequest,
        project: &ProjectConfig,
        architecture: &ArchitectureMetadata,
        artifact: Option<&ArtifactMetadata>,
    ) -> Result<GenerationPlan, DomainError> {
        let package = resolve_package(request.spec(), &project.base_package);
        let mut plan = GenerationPlan::new(request.kind(), package);

        match request.spec() {
            ArtifactSpec::Entity(spec) => self.plan_entity(&mut plan, spec, project),
            ArtifactSpec::UseCase(spec) => self.plan_use_case(&mut plan, spec, project, architecture),
            ArtifactSpec::Adapter(spec) => {
                let artifact = artifact.ok_or(DomainError::MissingRequiredField {
                    field: "adapter metadata",
                })?;
                self.plan_adapter(&mut plan, spec, project, architecture, artifact)?;
            }
            ArtifactSpec::InputAdapter(spec) => {
                self.plan_input_adapter(&mut plan, spec, project, architecture)?;
            }
        }
        Ok(plan)
    }

    fn plan_entity(&self, plan: &mut GenerationPlan, spec: &EntitySpec, project: &ProjectConfig) {
        let fields: Vec<Value> = spec
            .fields
            .iter()
            .map(|f| json!({ "name": f.name, "type": f.field_type, "nullable": f.nullable }))
            .collect();
        let bindings = with_project(
            json!({
                "packageName": plan.package,
                "entityName": spec.name,
                "hasId": spec.has_id,
                "idType": spec.id_type,
                "fields": fields,
                "needsUUID": spec.has_id && spec.id_type == "UUID",
                "needsLocalDateTime": spec.fields.iter().any(|f| f.field_type == "LocalDateTime"),
            }),
            project,
        );

        let prefix = project.architecture.is_multi_module().then_some("domain");
        plan.files.push(source(
            java_path(prefix, &plan.package, &format!("{}.java", spec.name)),
            "components/entity/Entity.java.tera",
            bindings,
        ));
    }

    fn plan_use_case(
        &self,
        plan: &mut GenerationPlan,
        spec: &UseCaseSpec,
        project: &ProjectConfig,
        architecture: &ArchitectureMetadata,
    ) {
        let root = framework_root(project);
        let impl_package = use_case_impl_package(&plan.package);
        let port_name = architecture.class_name("useCase", &spec.name, "UseCase");
        let bindings = with_project(
            json!({
                "useCaseName": spec.name,
                "portName": port_name,
                "packageName": plan.package,
                "implPackage": impl_package,
                "methods": methods(&spec.methods),
                "generatePort": spec.generate_port,
                "generateImpl": spec.generate_impl,
            }),
            project,
        );

        if spec.generate_port {
            plan.files.push(source(
                java_path(None, &plan.package, &format!("{port_name}.java")),
                format!("{root}/usecase/InputPort.java.tera"),
                bindings.clone(),
            ));
        }
        if spec.generate_impl {
            plan.files.push(source(
                java_path(None, &impl_package, &format!("{}UseCaseImpl.java", spec.name)),
                format!("{root}/usecase/UseCase.java.tera"),
                bindings,
            ));
        }
    }

    fn plan_adapter(
        &self,
        plan: &mut GenerationPlan,
        spec: &AdapterSpec,
        project: &ProjectConfig,
        architecture: &ArchitectureMetadata,
        artifact: &ArtifactMetadata,
    ) -> Result<(), DomainError> {
        let root = format!("{}/adapters/driven-adapters", framework_root(project));
        let type_dir = spec.adapter_type.as_str();
        let module_path = project
            .adapters_as_modules
            .then(|| adapter_module_path(&spec.name));

        let dir = self.resolver.resolve(
            architecture,
            artifact.role.as_str(),
            &spec.name,
            &self.placeholders(&plan.package, project, architecture, module_path.as_deref()),
        )?;
        plan.layer_checks.push(dir.clone());

        let class_name = architecture.class_name("adapter", &spec.name, "Adapter");
        let base = json!({
            "adapterName": spec.name,
            "className": class_name,
            "packageName": plan.package,
            "entityName": spec.entity_name,
            "adapterType": type_dir,
            "methods": methods(&spec.methods),
            "mapperPackage": format!("{}.mapper", plan.package),
            "dataPackage": format!("{}.entity", plan.package),
        });
        let bindings = with_project(base, project);

        if let Some(module_path) = &module_path {
            plan.files.push(PlannedFile {
                path: PathBuf::from(module_path).join(ROOT_DESCRIPTOR),
                template_id: format!("{root}/module-build.gradle.kts.tera"),
                bindings: with_project(
                    json!({ "adapterType": type_dir, "moduleName": module_path }),
                    project,
                ),
                kind: PlannedFileKind::ModuleDescriptor,
                optional: true,
            });
            plan.settings_includes.push(module_path.clone());
        }

        plan.files.push(source(
            dir.join(format!("{class_name}.java")),
            format!("{root}/{type_dir}/Adapter.java.tera"),
            bindings.clone(),
        ));

        if spec.adapter_type.needs_data_mapping() {
            plan.files.push(source(
                dir.join("mapper").join(format!("{}Mapper.java", spec.entity_name)),
                format!("{root}/generic/Mapper.java.tera"),
                bindings.clone(),
            ));
            plan.files.push(source(
                dir.join("entity").join(format!("{}Data.java", spec.entity_name)),
                format!("{root}/{type_dir}/Entity.java.tera"),
                bindings.clone(),
            ));
        }

        if let Some(template) = artifact
            .properties_template
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            plan.properties = Some(PropertiesMerge {
                path: PathBuf::from(APPLICATION_PROPERTIES),
                template_id: format!("adapters/{type_dir}/{template}"),
                bindings: bindings.clone(),
            });
        }

        for class in &artifact.configuration_classes {
            let package = format!("{}.{}", project.base_package, class.package_suffix);
            let mut class_bindings = bindings.clone();
            class_bindings.insert("className".into(), json!(class.name));
            class_bindings.insert("packageName".into(), json!(package));
            plan.files.push(PlannedFile {
                path: java_path(None, &package, &format!("{}.java", class.name)),
                template_id: format!("{}/{}", adapter_template_dir(spec.adapter_type), class.template),
                bindings: class_bindings,
                kind: PlannedFileKind::Shared,
                optional: false,
            });
        }

        let dependencies = artifact.all_dependencies();
        if !dependencies.is_empty() {
            let path = match &module_path {
                Some(module) => PathBuf::from(module).join(ROOT_DESCRIPTOR),
                None => PathBuf::from(ROOT_DESCRIPTOR),
            };
            plan.descriptor = Some(DescriptorUpdate { path, dependencies });
        }
        Ok(())
    }

    fn plan_input_adapter(
        &self,
        plan: &mut GenerationPlan,
        spec: &InputAdapterSpec,
        project: &ProjectConfig,
        architecture: &ArchitectureMetadata,
    ) -> Result<(), DomainError> {
        let dir = self.resolver.resolve(
            architecture,
            "driving",
            &spec.name,
            &self.placeholders(&plan.package, project, architecture, None),
        )?;
        plan.layer_checks.push(dir.clone());

        let suffix = spec.adapter_type.class_suffix();
        let class_name = architecture.class_name("entryPoint", &spec.name, suffix);
        let endpoints: Vec<Value> = spec
            .endpoints
            .iter()
            .map(|e| {
                json!({
                    "path": e.path,
                    "method": e.method.as_str(),
                    "useCaseMethod": e.use_case_method,
                    "returnType": e.return_type,
                    "parameters": e.parameters.iter().map(|p| json!({
                        "name": p.name,
                        "type": p.param_type,
                        "paramType": p.binding.as_str(),
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        let bindings = with_project(
            json!({
                "controllerName": spec.name,
                "className": class_name,
                "packageName": plan.package,
                "useCaseName": spec.use_case_name,
                "adapterType": spec.adapter_type.as_str(),
                "endpoints": endpoints,
            }),
            project,
        );

        plan.files.push(source(
            dir.join(format!("{class_name}.java")),
            format!(
                "{}/adapters/entry-points/{}/{suffix}.java.tera",
                framework_root(project),
                spec.adapter_type.as_str()
            ),
            bindings,
        ));
        Ok(())
    }

    fn placeholders(
        &self,
        package: &str,
        project: &ProjectConfig,
        architecture: &ArchitectureMetadata,
        module_path: Option<&str>,
    ) -> Placeholders {
        let mut placeholders = Placeholders::new();
        placeholders.insert("basePackage".into(), project.base_package_path());
        placeholders.insert("package".into(), package.replace('.', "/"));
        match module_path {
            Some(module) => {
                placeholders.insert("module".into(), module.to_string());
            }
            None if architecture.modules.iter().any(|m| m == "infrastructure") => {
                placeholders.insert("module".into(), "infrastructure".into());
            }
            None => {}
        }
        placeholders
    }
}

/// Template directory holding an adapter's metadata and extras.
pub fn adapter_template_dir(adapter_type: AdapterType) -> String {
    format!("adapters/{}", adapter_type.as_str())
}

fn framework_root(project: &ProjectConfig) -> String {
    format!("frameworks/{}/{}", project.framework, project.paradigm)
}

fn package_segment(tag: &str) -> String {
    tag.replace('-', "")
}

fn java_path(prefix: Option<&str>, package: &str, file: &str) -> PathBuf {
    let mut path = prefix.map(PathBuf::from).unwrap_or_default();
    path.push(JAVA_ROOT);
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(file);
    path
}

fn source(path: PathBuf, template_id: impl Into<String>, bindings: Bindings) -> PlannedFile {
    PlannedFile {
        path,
        template_id: template_id.into(),
        bindings,
        kind: PlannedFileKind::Source,
        optional: false,
    }
}

fn methods(methods: &[MethodSpec]) -> Vec<Value> {
    methods
        .iter()
        .map(|m| {
            json!({
                "name": m.name,
                "returnType": m.return_type,
                "parameters": m.parameters.iter().map(|p| json!({
                    "name": p.name,
                    "type": p.param_type,
                })).collect::<Vec<_>>(),
            })
        })
        .collect()
}

/// Adds the project-wide variables every template can use.
fn with_project(value: Value, project: &ProjectConfig) -> Bindings {
    let mut bindings = match value {
        Value::Object(map) => map,
        _ => Bindings::new(),
    };
    bindings.insert("projectName".into(), json!(project.name));
    bindings.insert("basePackage".into(), json!(project.base_package));
    bindings.insert("framework".into(), json!(project.framework.as_str()));
    bindings.insert("paradigm".into(), json!(project.paradigm.as_str()));
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AdapterRole, ArchitectureType, ConfigurationClass, EntityField, InputAdapterType,
        LayerDependencies,
    };
    use std::path::Path;

    fn project() -> ProjectConfig {
        ProjectConfig::new("shop", "com.acme").unwrap()
    }

    fn hexagonal() -> ArchitectureMetadata {
        ArchitectureMetadata::new(ArchitectureType::HexagonalSingle)
            .with_path("driven", "{module}/src/main/java/{package}")
            .with_path("driving", "src/main/java/{package}")
            .with_layer_dependencies(
                LayerDependencies::new()
                    .allow("domain", Vec::<String>::new())
                    .allow("infrastructure", ["domain"]),
            )
    }

    fn redis_metadata() -> ArtifactMetadata {
        ArtifactMetadata::new("redis", AdapterRole::Driven)
            .with_dependency(Dependency::compile(
                "org.springframework.boot",
                "spring-boot-starter-data-redis-reactive",
                "3.2.0",
            ))
            .with_test_dependency(Dependency::test("it.ozimov", "embedded-redis", "0.7.3"))
            .with_properties_template("application-properties.yml.tera")
            .with_configuration_class(ConfigurationClass {
                name: "RedisConfig".into(),
                package_suffix: "infrastructure.config".into(),
                template: "config/RedisConfig.java.tera".into(),
            })
    }

    fn paths(plan: &GenerationPlan) -> Vec<&Path> {
        plan.files.iter().map(|f| f.path.as_path()).collect()
    }

    // ── packages ──

    #[test]
    fn default_packages_follow_the_layout() {
        let base = "com.acme";
        let entity = ArtifactSpec::from(EntitySpec::new("Order", vec![]));
        let adapter = ArtifactSpec::from(AdapterSpec::new("Cache", AdapterType::RestClient, "Order"));
        assert_eq!(resolve_package(&entity, base), "com.acme.domain.model");
        assert_eq!(
            resolve_package(&adapter, base),
            "com.acme.infrastructure.drivenadapters.restclient"
        );
        assert_eq!(
            use_case_impl_package("com.acme.domain.port.in"),
            "com.acme.application.usecase"
        );
    }

    // ── entity & use case ──

    #[test]
    fn entity_lands_in_domain_module_for_multi_module_projects() {
        let request = GenerationRequest::new(
            "/p",
            EntitySpec::new("Order", vec![EntityField::new("total", "LocalDateTime")]),
        );
        let planner = GenerationPlanner::new();

        let single = planner.plan(&request, &project(), &hexagonal(), None).unwrap();
        assert_eq!(paths(&single), vec![Path::new("src/main/java/com/acme/domain/model/Order.java")]);
        assert_eq!(single.files[0].bindings["needsLocalDateTime"], json!(true));
        assert_eq!(single.files[0].bindings["projectName"], json!("shop"));

        let multi_project = project().with_architecture(ArchitectureType::HexagonalMulti);
        let multi = planner.plan(&request, &multi_project, &hexagonal(), None).unwrap();
        assert_eq!(
            paths(&multi),
            vec![Path::new("domain/src/main/java/com/acme/domain/model/Order.java")]
        );
    }

    #[test]
    fn use_case_plans_port_and_impl() {
        let request = GenerationRequest::new(
            "/p",
            UseCaseSpec::new("CreateOrder", vec![MethodSpec::new("create", "Order")]),
        );
        let plan = GenerationPlanner::new()
            .plan(&request, &project(), &hexagonal(), None)
            .unwrap();

        assert_eq!(
            paths(&plan),
            vec![
                Path::new("src/main/java/com/acme/domain/port/in/CreateOrderUseCase.java"),
                Path::new("src/main/java/com/acme/application/usecase/CreateOrderUseCaseImpl.java"),
            ]
        );
        assert_eq!(
            plan.templates(),
            vec![
                "frameworks/spring/reactive/usecase/InputPort.java.tera",
                "frameworks/spring/reactive/usecase/UseCase.java.tera",
            ]
        );
    }

    // ── adapters ──

    #[test]
    fn redis_adapter_plans_mapper_properties_config_and_descriptor() {
        let request = GenerationRequest::new("/p", AdapterSpec::new("Cache", AdapterType::Redis, "Order"));
        let plan = GenerationPlanner::new()
            .plan(&request, &project(), &hexagonal(), Some(&redis_metadata()))
            .unwrap();

        let dir = "src/main/java/com/acme/infrastructure/drivenadapters/redis";
        assert_eq!(
            paths(&plan),
            vec![
                PathBuf::from(format!("{dir}/CacheAdapter.java")).as_path(),
                PathBuf::from(format!("{dir}/mapper/OrderMapper.java")).as_path(),
                PathBuf::from(format!("{dir}/entity/OrderData.java")).as_path(),
                Path::new("src/main/java/com/acme/infrastructure/config/RedisConfig.java"),
            ]
        );
        assert_eq!(plan.files[3].kind, PlannedFileKind::Shared);
        assert_eq!(plan.layer_checks, vec![PathBuf::from(dir)]);
        assert_eq!(
            plan.properties.as_ref().map(|p| p.template_id.as_str()),
            Some("adapters/redis/application-properties.yml.tera")
        );
        let descriptor = plan.descriptor.as_ref().unwrap();
        assert_eq!(descriptor.path, PathBuf::from("build.gradle.kts"));
        assert_eq!(descriptor.dependencies.len(), 2);
        assert!(plan.settings_includes.is_empty());
        assert!(plan.templates().contains(&"frameworks/spring/reactive/adapters/driven-adapters/generic/Mapper.java.tera"));
    }

    #[test]
    fn module_adapters_get_descriptor_and_settings_include() {
        let request =
            GenerationRequest::new("/p", AdapterSpec::new("RedisCache", AdapterType::Redis, "Order"));
        let modular = project().with_adapters_as_modules(true);
        let plan = GenerationPlanner::new()
            .plan(&request, &modular, &hexagonal(), Some(&redis_metadata()))
            .unwrap();

        assert_eq!(plan.settings_includes, vec!["infrastructure/driven-adapters/redis-cache"]);
        assert_eq!(
            plan.files[0].path,
            PathBuf::from("infrastructure/driven-adapters/redis-cache/build.gradle.kts")
        );
        assert_eq!(plan.files[0].kind, PlannedFileKind::ModuleDescriptor);
        assert_eq!(
            plan.optional_templates(),
            vec!["frameworks/spring/reactive/adapters/driven-adapters/module-build.gradle.kts.tera"]
        );
        assert!(plan.files[1]
            .path
            .starts_with("infrastructure/driven-adapters/redis-cache/src/main/java/com/acme"));
        assert_eq!(
            plan.descriptor.as_ref().map(|d| d.path.clone()),
            Some(PathBuf::from("infrastructure/driven-adapters/redis-cache/build.gradle.kts"))
        );
        assert!(plan.touched_paths().contains(&PathBuf::from(SETTINGS_FILE)));
    }

    #[test]
    fn adapter_without_metadata_is_rejected() {
        let request = GenerationRequest::new("/p", AdapterSpec::new("Cache", AdapterType::Kafka, "Order"));
        let err = GenerationPlanner::new()
            .plan(&request, &project(), &hexagonal(), None)
            .unwrap_err();
        assert!(matches!(err, DomainError::MissingRequiredField { .. }));
    }

    #[test]
    fn unknown_role_surfaces_from_resolution() {
        let request =
            GenerationRequest::new("/p", InputAdapterSpec::new("Orders", InputAdapterType::Rest, "CreateOrder", vec![]));
        let arch = ArchitectureMetadata::new(ArchitectureType::OnionSingle).with_path("driven", "x/{name}");
        let err = GenerationPlanner::new()
            .plan(&request, &project(), &arch, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::UnknownRole { .. }));
    }

    #[test]
    fn input_adapter_uses_type_suffix() {
        let request = GenerationRequest::new(
            "/p",
            InputAdapterSpec::new("Orders", InputAdapterType::Graphql, "CreateOrder", vec![]),
        );
        let plan = GenerationPlanner::new()
            .plan(&request, &project(), &hexagonal(), None)
            .unwrap();
        assert_eq!(
            plan.files[0].path,
            PathBuf::from("src/main/java/com/acme/infrastructure/entrypoints/graphql/OrdersResolver.java")
        );
        assert_eq!(
            plan.files[0].template_id,
            "frameworks/spring/reactive/adapters/entry-points/graphql/Resolver.java.tera"
        );
    }
}
