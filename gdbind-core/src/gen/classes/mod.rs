pub mod object ; pub use object :: { Object } ; pub mod ref_counted ; pub use ref_counted :: { RefCounted } ; pub mod node ; pub use node :: { Node , INode } ; pub mod node_2d ; pub use node_2d :: { Node2D , INode2D } ; pub mod resource ; pub use resource :: { Resource , IResource } ; pub mod vector2_sum ; pub use vector2_sum :: { Vector2Sum , IVector2Sum } ; # [doc (hidden)] pub mod class_macros { pub use crate :: * ; pub use inherit_from_Object__gdbind ; pub use inherit_from_RefCounted__gdbind ; pub use inherit_from_Node__gdbind ; pub use inherit_from_Node2D__gdbind ; pub use inherit_from_Resource__gdbind ; pub use inherit_from_Vector2Sum__gdbind ; }