// tinebox geometry
//
// Turns a pin placement list into a 3D-printable solid. The cylinder body
// is a closed surface of revolution (outer wall, cap faces, and the two
// cap-lip recesses), and each pin is an oriented box appended to the same
// mesh with half its length embedded in the wall — overlapping closed
// shells, which slicers union for free, so no boolean CSG is needed.
//
// - mesh.rs: flat triangle buffers and quad/triangle emission
// - cylinder.rs: the revolved body, pin boxes, and `CylinderConfig`
// - stl.rs: binary STL output over any `io::Write`

pub mod cylinder;
pub mod mesh;
pub mod stl;
