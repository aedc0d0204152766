//! URL space of the console and the role allow-list registered for each path.

use std::fmt;

use serde::Serialize;

use crate::session::Role;

/// Resource id as it appears in a path segment
pub type RecordId = String;

/// Which backend collection a resource route belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Teachers,
    Students,
    SchoolClasses,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Teachers,
        Collection::Students,
        Collection::SchoolClasses,
    ];

    /// Path segment, shared by the console routes and the REST API
    pub fn segment(&self) -> &'static str {
        match self {
            Collection::Teachers => "teachers",
            Collection::Students => "students",
            Collection::SchoolClasses => "school-classes",
        }
    }

    /// The create screen for classes lives under `/created`
    fn create_segment(&self) -> &'static str {
        match self {
            Collection::SchoolClasses => "created",
            _ => "create",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.segment() == segment)
    }
}

/// A resolved navigation target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
    AdminDashboard,
    TeacherDashboard,
    StudentDashboard,
    List(Collection),
    Create(Collection),
    Detail(Collection, RecordId),
    Edit(Collection, RecordId),
}

/// Static registration of a path pattern and who may visit it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub pattern: &'static str,
    /// `None` admits any authenticated session
    pub allowed_roles: Option<&'static [Role]>,
    /// Public routes skip the guard entirely
    pub public: bool,
}

impl RouteDescriptor {
    pub const fn public(pattern: &'static str) -> Self {
        Self {
            pattern,
            allowed_roles: None,
            public: true,
        }
    }

    pub const fn authenticated(pattern: &'static str) -> Self {
        Self {
            pattern,
            allowed_roles: None,
            public: false,
        }
    }

    pub const fn restricted(pattern: &'static str, roles: &'static [Role]) -> Self {
        Self {
            pattern,
            allowed_roles: Some(roles),
            public: false,
        }
    }

    pub fn admits(&self, role: Option<Role>) -> bool {
        match self.allowed_roles {
            None => true,
            Some(roles) => role.is_some_and(|r| roles.contains(&r)),
        }
    }
}

const EVERY_ROLE: &[Role] = &[Role::SuperAdmin, Role::Teacher, Role::Student];
const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];
const TEACHER: &[Role] = &[Role::Teacher];
const STUDENT: &[Role] = &[Role::Student];

// Admits nobody; only reachable if a route is missing from the table
static UNREGISTERED: RouteDescriptor = RouteDescriptor::restricted("", &[]);

/// Every route the console registers, in registration order
pub static ROUTE_TABLE: &[RouteDescriptor] = &[
    RouteDescriptor::public("/login"),
    RouteDescriptor::restricted("/dashboard", EVERY_ROLE),
    RouteDescriptor::restricted("/admin/dashboard", SUPER_ADMIN),
    RouteDescriptor::restricted("/teacher/dashboard", TEACHER),
    RouteDescriptor::restricted("/student/dashboard", STUDENT),
    RouteDescriptor::restricted("/teachers", SUPER_ADMIN),
    RouteDescriptor::restricted("/teachers/create", SUPER_ADMIN),
    RouteDescriptor::restricted("/teachers/:id", SUPER_ADMIN),
    RouteDescriptor::restricted("/teachers/:id/edit", SUPER_ADMIN),
    RouteDescriptor::restricted("/students", SUPER_ADMIN),
    RouteDescriptor::restricted("/students/create", SUPER_ADMIN),
    RouteDescriptor::restricted("/students/:id", SUPER_ADMIN),
    RouteDescriptor::restricted("/students/:id/edit", SUPER_ADMIN),
    RouteDescriptor::restricted("/school-classes", SUPER_ADMIN),
    RouteDescriptor::restricted("/school-classes/created", SUPER_ADMIN),
    RouteDescriptor::restricted("/school-classes/:id", SUPER_ADMIN),
    RouteDescriptor::restricted("/school-classes/:id/edit", SUPER_ADMIN),
];

impl Route {
    /// Resolve a path, ignoring any query string, fragment or trailing slash
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Some(Route::Login),
            ["dashboard"] => Some(Route::Dashboard),
            ["admin", "dashboard"] => Some(Route::AdminDashboard),
            ["teacher", "dashboard"] => Some(Route::TeacherDashboard),
            ["student", "dashboard"] => Some(Route::StudentDashboard),
            [collection] => Collection::from_segment(collection).map(Route::List),
            [collection, rest] => {
                let collection = Collection::from_segment(collection)?;
                if *rest == collection.create_segment() {
                    Some(Route::Create(collection))
                } else {
                    Some(Route::Detail(collection, rest.to_string()))
                }
            }
            [collection, id, "edit"] => {
                Collection::from_segment(collection).map(|c| Route::Edit(c, id.to_string()))
            }
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AdminDashboard => "/admin/dashboard".to_string(),
            Route::TeacherDashboard => "/teacher/dashboard".to_string(),
            Route::StudentDashboard => "/student/dashboard".to_string(),
            Route::List(c) => format!("/{}", c.segment()),
            Route::Create(c) => format!("/{}/{}", c.segment(), c.create_segment()),
            Route::Detail(c, id) => format!("/{}/{}", c.segment(), id),
            Route::Edit(c, id) => format!("/{}/{}/edit", c.segment(), id),
        }
    }

    /// The registered descriptor for this route
    pub fn descriptor(&self) -> &'static RouteDescriptor {
        let pattern = match self {
            Route::Login => "/login",
            Route::Dashboard => "/dashboard",
            Route::AdminDashboard => "/admin/dashboard",
            Route::TeacherDashboard => "/teacher/dashboard",
            Route::StudentDashboard => "/student/dashboard",
            Route::List(Collection::Teachers) => "/teachers",
            Route::Create(Collection::Teachers) => "/teachers/create",
            Route::Detail(Collection::Teachers, _) => "/teachers/:id",
            Route::Edit(Collection::Teachers, _) => "/teachers/:id/edit",
            Route::List(Collection::Students) => "/students",
            Route::Create(Collection::Students) => "/students/create",
            Route::Detail(Collection::Students, _) => "/students/:id",
            Route::Edit(Collection::Students, _) => "/students/:id/edit",
            Route::List(Collection::SchoolClasses) => "/school-classes",
            Route::Create(Collection::SchoolClasses) => "/school-classes/created",
            Route::Detail(Collection::SchoolClasses, _) => "/school-classes/:id",
            Route::Edit(Collection::SchoolClasses, _) => "/school-classes/:id/edit",
        };

        ROUTE_TABLE
            .iter()
            .find(|d| d.pattern == pattern)
            .unwrap_or(&UNREGISTERED)
    }

    /// Landing page after login
    pub fn dashboard_for(role: Option<Role>) -> Self {
        match role {
            Some(Role::SuperAdmin) => Route::AdminDashboard,
            Some(Role::Teacher) => Route::TeacherDashboard,
            Some(Role::Student) => Route::StudentDashboard,
            None => Route::Dashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
